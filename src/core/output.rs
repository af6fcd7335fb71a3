//! Presentation of tick reports.
//!
//! The live loop hands every report to a [`ReportSink`]. The terminal sink
//! redraws a single status line in place; the JSON sink prints one object per
//! line for other programs to consume.

use anyhow::Result;
use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::Write;

use crate::error::ScheduleError;
use crate::schedule::{BoundaryReport, TickReport};

/// Receives everything the live loop wants to show.
pub trait ReportSink {
    /// Show the report of a completed tick.
    fn present(&mut self, report: &TickReport) -> Result<()>;

    /// A tick was skipped.
    fn skipped(&mut self, _error: &ScheduleError) -> Result<()> {
        Ok(())
    }

    /// Called before anything else is logged, so that log lines do not land
    /// in the middle of a redrawn status line.
    fn interrupt(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once when the loop ends.
    fn finish(&mut self) -> Result<()> {
        self.interrupt()
    }
}

fn boundary_segment(report: &BoundaryReport) -> String {
    match report {
        BoundaryReport::Counting {
            kind,
            time,
            countdown,
            ..
        } => format!("{} {time} in {countdown}", kind.label()),
        BoundaryReport::Unavailable { kind, .. } => format!("{} --:--:--", kind.label()),
    }
}

/// Single-line rendering of a report, as shown on the terminal.
pub fn render_status_line(report: &TickReport) -> String {
    format!(
        "┃ {} {} │ {} │ {} │ {}",
        report.current_date,
        report.current_time,
        report.location,
        boundary_segment(&report.cutoff),
        boundary_segment(&report.start)
    )
}

/// Redraws the status line in place on a terminal.
pub struct TerminalSink<W: Write> {
    out: W,
    line_active: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line_active: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TerminalSink<W> {
    fn present(&mut self, report: &TickReport) -> Result<()> {
        queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(render_status_line(report))
        )?;
        self.out.flush()?;
        self.line_active = true;
        Ok(())
    }

    fn interrupt(&mut self) -> Result<()> {
        if self.line_active {
            writeln!(self.out)?;
            self.out.flush()?;
            self.line_active = false;
        }
        Ok(())
    }
}

/// Prints every report as a JSON object on its own line.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn present(&mut self, report: &TickReport) -> Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn skipped(&mut self, error: &ScheduleError) -> Result<()> {
        let value = serde_json::json!({
            "status": "skipped",
            "reason": error.to_string(),
        });
        serde_json::to_writer(&mut self.out, &value)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
