use std::env;
use std::fs;
use std::path::PathBuf;

use processor::{format_logs, Processor, Report};
use scheduler::{Config, ProcessSpec, RoundRobin, Simulation};


static SCHEDULER: &str = "round-robin";

fn output_path(folder: &str, name: &str, quantum: usize) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../outputs")
        .join(SCHEDULER)
        .join(folder)
        .join(format!("{name}___{quantum}.log"))
}

fn write_output(folder: &str, name: &str, quantum: usize, output: &str) {
    let path = output_path(folder, name, quantum);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, output).unwrap();
}

fn read_output(folder: &str, name: &str, quantum: usize) -> String {
    fs::read_to_string(output_path(folder, name, quantum)).unwrap()
}

/// Simulates `processes` and checks the report against the reference output
/// of the test, or rewrites it when `WRITE_OUTPUT` is set.
fn run(folder: &str, name: &str, processes: &[(i64, i64, i64)], quantum: usize) -> Simulation {
    let (simulation, logs) = simulate(processes, Config::new(quantum));
    let output = Report::new(&simulation).unwrap().to_string();

    println!("{}", format_logs(&logs));

    if env::var("WRITE_OUTPUT").is_ok() {
        write_output(folder, name, quantum, &output);
    } else {
        let reference = read_output(folder, name, quantum);

        println!("\nleft = Correct Output\nright = Your Output\n");
        use pretty_assertions::assert_eq;
        assert_eq!(reference, output);
    }
    simulation
}

fn simulate(processes: &[(i64, i64, i64)], config: Config) -> (Simulation, Vec<processor::Log>) {
    let specs = processes.iter().copied().map(ProcessSpec::from);
    Processor::run(RoundRobin::new(specs, config).unwrap())
}
