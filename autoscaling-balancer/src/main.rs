use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;

use autoscaling_balancer::{
    Balancer, BalancerConfig, LeastLoaded, LoadConfig, LoadGenerator, PlacementPolicy,
    RandomPlacement, RoundRobin, Server, UniformLoad,
};

#[derive(Parser)]
#[command(
    name = "balancer-sim",
    about = "Drive an autoscaling connection balancer through its demo scenarios",
    version
)]
struct Cli {
    /// Balancer config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for placement and load draws; random if omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// Connections admitted during the bulk scenario
    #[arg(short = 'n', long, default_value_t = 100)]
    connections: u32,
    /// Placement policy
    #[arg(short, long, value_enum, default_value_t = Policy::Random)]
    policy: Policy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    Random,
    RoundRobin,
    LeastLoaded,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("balancer_sim=info".parse()?)
                .add_directive("autoscaling_balancer=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BalancerConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BalancerConfig::default(),
    };

    single_server(&config.load, cli.seed)?;

    let load = match cli.seed {
        Some(seed) => UniformLoad::seeded(config.load.clone(), seed),
        None => UniformLoad::new(config.load.clone()),
    };
    match cli.policy {
        Policy::Random => {
            let policy = match cli.seed {
                Some(seed) => RandomPlacement::seeded(seed),
                None => RandomPlacement::new(),
            };
            pool(Balancer::with_policy(policy, load, &config)?, cli.connections)
        }
        Policy::RoundRobin => pool(
            Balancer::with_policy(RoundRobin::new(), load, &config)?,
            cli.connections,
        ),
        Policy::LeastLoaded => pool(
            Balancer::with_policy(LeastLoaded::new(), load, &config)?,
            cli.connections,
        ),
    }
}

/// Add and remove one connection on a lone server.
fn single_server(config: &LoadConfig, seed: Option<u64>) -> anyhow::Result<()> {
    let mut load = match seed {
        Some(seed) => UniformLoad::seeded(config.clone(), seed),
        None => UniformLoad::new(config.clone()),
    };
    let mut server = Server::new(0);

    server.add_connection("192.168.1.1".into(), &mut load)?;
    println!("server load after add: {:.2}", server.load());

    server.close_connection(&"192.168.1.1".into())?;
    println!("server load after close: {:.2}", server.load());
    Ok(())
}

/// Single admission, manual growth, closure, then bulk admission.
fn pool<P, L>(mut lb: Balancer<P, L>, connections: u32) -> anyhow::Result<()>
where
    P: PlacementPolicy,
    L: LoadGenerator,
{
    lb.add_connection("fdca:83d2::f20d")?;
    println!("avg load after first connection: {:.2}", lb.avg_load()?);

    lb.add_server();
    println!("avg load with a second server: {:.2}", lb.avg_load()?);

    lb.close_connection("fdca:83d2::f20d")?;
    println!("avg load after close: {:.2}", lb.avg_load()?);

    let mut scale_ups = 0;
    for connection in 0..connections {
        if lb.add_connection(connection)?.scaled {
            scale_ups += 1;
        }
    }
    info!(
        connections,
        servers = lb.server_count(),
        scale_ups,
        "bulk admission done"
    );

    println!("{}", lb);
    println!("avg load: {:.2}", lb.avg_load()?);
    Ok(())
}
