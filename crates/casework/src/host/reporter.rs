//! Reporter - display sub-test results

use crate::host::harness::SubTestReport;
use std::io::{self, Write};
use std::time::Duration;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Color mode for report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect terminal capabilities
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Resolve to a termcolor ColorChoice
    pub fn to_color_choice(self) -> ColorChoice {
        // NO_COLOR wins over everything (https://no-color.org)
        if std::env::var_os("NO_COLOR").is_some() {
            return ColorChoice::Never;
        }
        match self {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

/// Report settings for a [`crate::Harness`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// One line per sub-test instead of dots
    pub verbose: bool,
    pub color: ColorMode,
    /// Show per sub-test and total timings
    pub durations: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: ColorMode::Auto,
            durations: true,
        }
    }
}

impl ReportConfig {
    /// Plain output: verbose lines, no colors, no timings.
    /// Stable across runs, which makes it the choice for snapshotting reports.
    pub fn plain() -> Self {
        Self {
            verbose: true,
            color: ColorMode::Never,
            durations: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    pub fn with_durations(mut self, durations: bool) -> Self {
        self.durations = durations;
        self
    }
}

fn spec(fg: Option<Color>, bold: bool) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(fg).set_bold(bold);
    spec
}

fn paint(w: &mut impl WriteColor, text: &str, spec: &ColorSpec) -> io::Result<()> {
    w.set_color(spec)?;
    write!(w, "{}", text)?;
    w.reset()
}

/// Sub-test reporter with output configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    config: ReportConfig,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Print the report for one harness to stdout
    pub fn report(&self, root: &str, runs: &[SubTestReport], root_failures: &[String]) {
        print!("{}", self.render(root, runs, root_failures));
    }

    /// Render the full report: per sub-test lines, summary, failure details.
    ///
    /// Colors go into the returned text as ANSI sequences when the color
    /// mode resolves to colored output for stdout.
    pub fn render(&self, root: &str, runs: &[SubTestReport], root_failures: &[String]) -> String {
        let mut buf = self.buffer();
        let _ = self.write_report(&mut buf, root, runs, root_failures);
        String::from_utf8_lossy(buf.as_slice()).into_owned()
    }

    fn buffer(&self) -> Buffer {
        match self.config.color.to_color_choice() {
            ColorChoice::Never => Buffer::no_color(),
            ColorChoice::Always | ColorChoice::AlwaysAnsi => Buffer::ansi(),
            ColorChoice::Auto => BufferWriter::stdout(ColorChoice::Auto).buffer(),
        }
    }

    /// Write the full report to a WriteColor sink
    pub fn write_report(
        &self,
        w: &mut impl WriteColor,
        root: &str,
        runs: &[SubTestReport],
        root_failures: &[String],
    ) -> io::Result<()> {
        for run in runs {
            self.write_result(w, run)?;
        }

        // Dots need a newline before the summary
        if !self.config.verbose && !runs.is_empty() {
            writeln!(w)?;
        }

        writeln!(w)?;
        self.write_summary(w, root, runs, root_failures)?;
        self.write_failures(w, root, runs, root_failures)
    }

    fn write_result(&self, w: &mut impl WriteColor, run: &SubTestReport) -> io::Result<()> {
        if !self.config.verbose {
            return if run.is_pass() {
                paint(w, ".", &spec(Some(Color::Green), false))
            } else {
                paint(w, "F", &spec(Some(Color::Red), true))
            };
        }

        write!(w, "{}", "  ".repeat(run.depth))?;
        if run.is_pass() {
            paint(w, "PASS", &spec(Some(Color::Green), true))?;
        } else {
            paint(w, "FAIL", &spec(Some(Color::Red), true))?;
        }
        if self.config.durations {
            writeln!(w, " {} ({:.2?})", run.name, run.duration)
        } else {
            writeln!(w, " {}", run.name)
        }
    }

    fn write_summary(
        &self,
        w: &mut impl WriteColor,
        root: &str,
        runs: &[SubTestReport],
        root_failures: &[String],
    ) -> io::Result<()> {
        let total = runs.len();
        let passed = runs.iter().filter(|r| r.is_pass()).count();
        let failed = total - passed;

        writeln!(w, "{}", "─".repeat(50))?;

        write!(w, "{} result: ", root)?;
        if failed > 0 || !root_failures.is_empty() {
            paint(w, "FAILED", &spec(Some(Color::Red), true))?;
        } else {
            paint(w, "PASSED", &spec(Some(Color::Green), true))?;
        }
        write!(w, " | ")?;
        paint(w, &total.to_string(), &spec(None, true))?;
        write!(w, " total, ")?;
        paint(w, &passed.to_string(), &spec(Some(Color::Green), true))?;
        write!(w, " passed, ")?;
        if failed > 0 {
            paint(w, &failed.to_string(), &spec(Some(Color::Red), true))?;
        } else {
            write!(w, "{}", failed)?;
        }
        writeln!(w, " failed")?;

        if self.config.durations {
            // Nested runs are already included in their parent's time
            let total_duration: Duration = runs
                .iter()
                .filter(|r| r.depth == 0)
                .map(|r| r.duration)
                .sum();
            writeln!(w, "Time: {:.2?}", total_duration)?;
        }
        Ok(())
    }

    fn write_failures(
        &self,
        w: &mut impl WriteColor,
        root: &str,
        runs: &[SubTestReport],
        root_failures: &[String],
    ) -> io::Result<()> {
        let failures: Vec<(&str, &[String])> = std::iter::once((root, root_failures))
            .filter(|(_, messages)| !messages.is_empty())
            .chain(
                runs.iter()
                    .filter(|r| !r.failures().is_empty())
                    .map(|r| (r.name.as_str(), r.failures())),
            )
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        writeln!(w)?;
        paint(w, "Failures:", &spec(Some(Color::Red), true))?;
        writeln!(w)?;
        writeln!(w)?;

        let mut dimmed = ColorSpec::new();
        dimmed.set_dimmed(true);

        for (name, messages) in failures {
            write!(w, "  ")?;
            paint(w, "●", &spec(Some(Color::Red), false))?;
            write!(w, " ")?;
            paint(w, name, &spec(None, true))?;
            writeln!(w)?;
            for message in messages {
                for line in message.lines() {
                    write!(w, "      ")?;
                    paint(w, line, &dimmed)?;
                    writeln!(w)?;
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::harness::Outcome;

    fn make_pass(name: &str) -> SubTestReport {
        SubTestReport {
            name: format!("suite/{}", name),
            depth: 0,
            outcome: Outcome::Pass,
            duration: Duration::from_millis(10),
        }
    }

    fn make_fail(name: &str, error: &str) -> SubTestReport {
        SubTestReport {
            name: format!("suite/{}", name),
            depth: 0,
            outcome: Outcome::Fail {
                failures: vec![error.to_string()],
            },
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_reporter_all_pass() {
        let runs = vec![make_pass("one"), make_pass("two")];

        let out = Reporter::new(ReportConfig::plain()).render("suite", &runs, &[]);
        assert!(out.contains("PASS suite/one"));
        assert!(out.contains("suite result: PASSED | 2 total, 2 passed, 0 failed"));
        assert!(!out.contains("Failures:"));
    }

    #[test]
    fn test_reporter_with_failures() {
        let runs = vec![
            make_pass("good"),
            make_fail("bad", "unexpected value:\n    actual:   5\n    expected: 6"),
        ];

        let out = Reporter::new(ReportConfig::plain()).render("suite", &runs, &[]);
        assert!(out.contains("FAIL suite/bad"));
        assert!(out.contains("1 failed"));
        assert!(out.contains("  ● suite/bad\n"));
        assert!(out.contains("          actual:   5\n"));
    }

    #[test]
    fn test_reporter_quiet_mode() {
        let runs = vec![make_pass("one"), make_fail("two", "x")];

        let config = ReportConfig::plain().with_verbose(false);
        let out = Reporter::new(config).render("suite", &runs, &[]);
        assert!(out.starts_with(".F\n"));
    }

    #[test]
    fn test_reporter_durations() {
        let runs = vec![make_pass("one"), make_pass("two")];

        let config = ReportConfig::plain().with_durations(true);
        let out = Reporter::new(config).render("suite", &runs, &[]);
        assert!(out.contains("PASS suite/one (10.00ms)"));
        assert!(out.contains("Time: 20.00ms"));
    }

    #[test]
    fn test_reporter_root_failures() {
        let root_failures = vec!["outside".to_string()];
        let out = Reporter::new(ReportConfig::plain()).render("suite", &[], &root_failures);
        assert!(out.contains("FAILED"));
        assert!(out.contains("  ● suite\n      outside\n"));
    }

    #[test]
    fn test_reporter_empty() {
        let out = Reporter::new(ReportConfig::plain()).render("suite", &[], &[]);
        assert!(out.contains("0 total"));
    }

    #[test]
    fn test_colors_stay_in_the_buffer() {
        let runs = vec![make_pass("one")];
        let mut colored = Buffer::ansi();
        let mut plain = Buffer::no_color();

        let reporter = Reporter::new(ReportConfig::plain());
        reporter.write_report(&mut colored, "suite", &runs, &[]).unwrap();
        reporter.write_report(&mut plain, "suite", &runs, &[]).unwrap();

        let colored = String::from_utf8_lossy(colored.as_slice()).into_owned();
        let plain = String::from_utf8_lossy(plain.as_slice()).into_owned();
        assert!(colored.contains("\u{1b}["));
        assert!(!plain.contains("\u{1b}["));
        assert!(plain.contains("PASS suite/one"));
    }
}
