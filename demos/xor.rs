use ferrite_backprop::{
    train, ActivationFunction, Hyperparameters, Network, Topology, TrainingSet,
};

fn main() -> ferrite_backprop::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let topology = Topology::new(vec![2, 4, 1])?;
    let params = Hyperparameters {
        learning_rate: 1.0,
        learning_rate_modifier: 2.0,
        min_learning_rate: 1e-6,
        max_learning_rate: Some(5.0),
        error_threshold: 0.01,
        max_iterations: 100_000,
        random_range: (-1.5, 1.5),
    };

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let expected_outputs = vec![
        vec![0.0],
        vec![1.0],
        vec![1.0],
        vec![0.0],
    ];
    let training_set = TrainingSet::from_pairs(inputs, expected_outputs, &topology)?;

    let mut network = Network::new(topology, ActivationFunction::Sigmoid, None, params.random_range)?;
    let outcome = train(&mut network, &training_set, params)?;

    println!("{} after {} iterations", outcome.reason, outcome.iterations);
    for case in training_set.iter() {
        println!("Input: {:?} -> Output: {:.4}", case.input, network.infer(&case.input)?[0]);
    }
    Ok(())
}
