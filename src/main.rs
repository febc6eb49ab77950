use anyhow::Context;
use grid_signal_sim::Scenario;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read scenario {path}"))?;
            Scenario::from_json(&json).with_context(|| format!("invalid scenario {path}"))?
        }
        None => Scenario::demo(),
    };
    let mut sim = scenario.build()?;

    println!(
        "Simulating {} vehicles on a {}x{} grid...",
        scenario.trips.len(),
        sim.grid().rows(),
        sim.grid().cols()
    );
    let start = Instant::now();
    sim.run(scenario.max_frames);
    println!("Finished in {:?}\n", start.elapsed());
    print!("{}", sim.summary());

    Ok(())
}
