//! Result of the name-consistency diagnostic.

use std::fmt;

/// Summary of a [`crate::Mempool::verify_names`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameIntegrityReport {
    pub entries_checked: usize,
    pub slots_checked: usize,
    pub violations: Vec<String>,
}

impl NameIntegrityReport {
    /// Returns `true` if no violations were detected.
    pub fn is_healthy(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for NameIntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} slots checked, {} violation(s)",
            self.entries_checked,
            self.slots_checked,
            self.violations.len()
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_report() {
        let report = NameIntegrityReport {
            entries_checked: 5,
            slots_checked: 2,
            violations: Vec::new(),
        };
        assert!(report.is_healthy());
        assert_eq!(report.to_string(), "5 entries, 2 slots checked, 0 violation(s)");
    }

    #[test]
    fn unhealthy_report_lists_violations() {
        let report = NameIntegrityReport {
            entries_checked: 1,
            slots_checked: 1,
            violations: vec!["dangling update".to_string()],
        };
        assert!(!report.is_healthy());
        assert!(report.to_string().ends_with("\n  - dangling update"));
    }
}
