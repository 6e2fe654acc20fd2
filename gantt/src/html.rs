//! Reads the Gantt chart from the solver page saved as HTML.
//!
//! The chart is the `div` carrying [`CHART_CLASS`]. Each of its child `div`s
//! is one line of the chart and holds a row of process cells followed by a
//! row of time cells:
//!
//! ```text
//! <div class="sc-a3b21388-0 evwFKR">
//!   <div>
//!     <div><div>A</div><div>B</div></div>
//!     <div><div>0</div><div>2</div><div>4</div></div>
//!   </div>
//!   ...
//! </div>
//! ```
//!
//! Rows alternate between process names and times across the whole chart,
//! not per line.

use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::{GanttChart, Result, Slot, SolverError};

/// Class list of the outermost `div` of the chart.
pub const CHART_CLASS: &str = "sc-a3b21388-0 evwFKR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Pids,
    Times,
}

fn child_divs(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "div")
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Parses the chart out of a whole HTML page.
///
/// An empty process cell, or one holding `_`, is an idle slot. A time
/// repeated where the chart wraps to a new line is only kept once.
pub fn parse_html_chart(html: &str) -> Result<GanttChart> {
    let selector = format!("div.{}", CHART_CLASS.replace(' ', "."));
    let selector =
        Selector::parse(&selector).map_err(|err| SolverError::Selector(err.to_string()))?;

    let document = Html::parse_document(html);
    let chart = document
        .select(&selector)
        .next()
        .ok_or(SolverError::MissingSection("the Gantt chart element"))?;

    let mut parsed = GanttChart::default();
    let mut next_row = Row::Pids;
    for line in child_divs(chart) {
        for row in child_divs(line) {
            match next_row {
                Row::Pids => {
                    for cell in child_divs(row) {
                        let slot = match cell_text(cell).as_str() {
                            "" | "_" => Slot::Idle,
                            pid => Slot::Process(pid.to_string()),
                        };
                        parsed.slots.push(slot);
                    }
                    next_row = Row::Times;
                }
                Row::Times => {
                    for cell in child_divs(row) {
                        let text = cell_text(cell);
                        let time = text
                            .parse::<usize>()
                            .map_err(|_| SolverError::InvalidToken(text))?;
                        if parsed.times.last() != Some(&time) {
                            parsed.times.push(time);
                        }
                    }
                    next_row = Row::Pids;
                }
            }
        }
    }

    debug!(
        "html gantt chart: {} slots, {} times",
        parsed.slots.len(),
        parsed.times.len()
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{parse_gantt_chart, split_sections};

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <div class="sc-1d4e3f2a-0 header"><div><div>Z</div></div></div>
  <div class="sc-a3b21388-0 evwFKR">
    <div>
      <div><div>A</div><div>B</div><div>C</div></div>
      <div><div>0</div><div>2</div><div>4</div><div>5</div></div>
    </div>
    <div>
      <div><div>A</div><div>B</div><div>A</div></div>
      <div><div>5</div><div>7</div><div>8</div><div>9</div></div>
    </div>
  </div>
</body>
</html>
"#;

    const TEXT_PAGE: &str = "\
Round-Robin, RR
Gantt Chart
A
0
B
2
C
4
A
5
5
B
7
A
8
9
Job\tArrival Time\tBurst Time\tFinish Time\tTurnaround Time\tWaiting Time
Average\t19 / 3 = 6.333\t10 / 3 = 3.333
";

    fn process(pid: &str) -> Slot {
        Slot::Process(pid.to_string())
    }

    #[test]
    fn wrapped_chart() {
        let chart = parse_html_chart(PAGE).unwrap();

        assert_eq!(
            chart.slots,
            ["A", "B", "C", "A", "B", "A"].map(process).to_vec()
        );
        assert_eq!(chart.times, vec![0, 2, 4, 5, 7, 8, 9]);
        assert_eq!(chart.first_execution("C"), Some(4));
    }

    #[test]
    fn same_chart_as_copied_text() {
        let (text_chart, _) = split_sections(TEXT_PAGE).unwrap();

        assert_eq!(
            parse_html_chart(PAGE).unwrap(),
            parse_gantt_chart(text_chart, 3).unwrap()
        );
    }

    #[test]
    fn idle_slots() {
        let page = r#"<div class="sc-a3b21388-0 evwFKR"><div>
            <div><div>A</div><div></div><div>B</div><div> _ </div><div>10</div></div>
            <div><div>0</div><div>2</div><div>4</div><div>6</div><div>7</div><div>9</div></div>
        </div></div>"#;
        let chart = parse_html_chart(page).unwrap();

        assert_eq!(
            chart.slots,
            vec![process("A"), Slot::Idle, process("B"), Slot::Idle, process("10")]
        );
        assert_eq!(chart.times, vec![0, 2, 4, 6, 7, 9]);
        assert_eq!(chart.pids(), vec!["A", "B", "10"]);
    }

    #[test]
    fn missing_chart() {
        assert!(matches!(
            parse_html_chart("<html><body><div class=\"evwFKR\"></div></body></html>"),
            Err(SolverError::MissingSection(_))
        ));
    }

    #[test]
    fn invalid_time() {
        let page = r#"<div class="sc-a3b21388-0 evwFKR"><div>
            <div><div>A</div></div>
            <div><div>0</div><div>two</div></div>
        </div></div>"#;

        assert!(matches!(
            parse_html_chart(page),
            Err(SolverError::InvalidToken(token)) if token == "two"
        ));
    }
}
