use mc_control::{config::*, *};
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_json_file(path)?,
        None => {
            let config = RunConfig::default();
            config.validate()?;
            config
        }
    };
    info!(?config, "Starting");

    let rng = &mut config.rng();
    let actions = config.actions();
    let mdp = DiscretizedMdp::new(
        config.growth_model()?,
        &actions,
        &config.n_bins,
        config.n_samples_per_action,
        rng,
    )?;

    let solution = match config.method {
        Method::ExploringStarts => run_mces(&mdp, config.n_iterations, rng)?,
        Method::EpsilonSoft => {
            run_epsilon_soft(&mdp, config.n_iterations, config.epsilon, rng)?.solution
        }
    };

    let savings = solution.policy_values(mdp.actions());
    for (s, k) in savings.iter().enumerate() {
        let x = mdp.state_value(s)[0];
        info!(state = s, income = x, savings = k, consumption = x - k, "Policy");
    }
    println!("{savings:?}");

    Ok(())
}
