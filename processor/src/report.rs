use std::fmt::{self, Display};

use serde::Serialize;

use scheduler::metrics::to_f64;
use scheduler::{ExecutionTrace, Metrics, Simulation, Summary};

/// The outcome of a simulation, ready to be printed or serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub trace: ExecutionTrace,
    pub metrics: Metrics,
    pub average_waiting_time: f64,
    pub average_response_time: f64,
}

impl Report {
    pub fn new(simulation: &Simulation) -> scheduler::Result<Report> {
        let metrics = Metrics::compute(&simulation.processes)?;
        Ok(Report {
            trace: simulation.trace.clone(),
            average_waiting_time: to_f64(metrics.summary.average_waiting_time()),
            average_response_time: to_f64(metrics.summary.average_response_time()),
            metrics,
        })
    }

    /// The Gantt chart, one line per slice.
    pub fn gantt(&self) -> String {
        let mut s = String::from("PID\tSTART\tEND\n");
        for slice in &self.trace {
            s.push_str(&format!("{}\t{}\t{}\n", slice.pid, slice.start, slice.end));
        }
        s
    }

    /// The per-process table, in input order.
    pub fn table(&self) -> String {
        let mut s = String::from("PID\tARRIVAL\tBURST\tFIRST\tDONE\tRESPONSE\tWAITING\n");
        for m in &self.metrics.processes {
            s.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                m.pid,
                m.arrival_time,
                m.burst_time,
                m.first_dispatch_time,
                m.completion_time,
                m.response_time,
                m.waiting_time
            ));
        }
        s
    }

    pub fn averages(&self) -> String {
        format_averages(&self.metrics.summary)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Gantt chart =====")?;
        write!(f, "{}", self.gantt())?;
        writeln!(f, "===== Processes =====")?;
        write!(f, "{}", self.table())?;
        writeln!(f, "===== Averages =====")?;
        write!(f, "{}", self.averages())
    }
}

/// The two summary lines, with two decimals.
pub fn format_averages(summary: &Summary) -> String {
    format!(
        "Average waiting time: {:.2}\nAverage response time: {:.2}\n",
        to_f64(summary.average_waiting_time()),
        to_f64(summary.average_response_time())
    )
}
