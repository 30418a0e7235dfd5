use log::info;

/// The ordered record of every decision taken while tabulating an election.
///
/// Lines are only ever appended. Each line is also sent to the logger.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct AuditLog {
    lines: Vec<String>,
}

impl AuditLog {
    pub fn new() -> AuditLog {
        AuditLog { lines: Vec::new() }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!("{}", line);
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The report, as published at the end of the election.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Joins names for display: `A, B and C`.
pub(crate) fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
            last.as_ref()
        ),
    }
}

pub(crate) fn plural(count: u64, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}
