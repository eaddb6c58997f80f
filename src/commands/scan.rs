// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Non-interactive hardware scan

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::hardware::{HardwareProbe, ProbeReport, ResourceProfile};
use crate::matcher::{match_catalog, MatchReport};
use crate::models::ModelCatalog;
use crate::report::{print_text, AdviceJson};

/// Probe output, derived budget and catalog match for one run
#[derive(Debug, Clone)]
pub struct Assessment {
    pub probe: ProbeReport,
    pub profile: ResourceProfile,
    pub matches: MatchReport,
}

impl Assessment {
    /// Nothing in the catalog fits
    pub fn struggles(&self) -> bool {
        self.matches.is_empty()
    }

    /// Print in the requested format
    pub fn print(&self, catalog: &ModelCatalog, format: &OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => {
                let json = AdviceJson::new(&self.probe, &self.profile, &self.matches, catalog);
                println!("{}", json.to_pretty_string()?);
                Ok(())
            }
            OutputFormat::Text => print_text(&self.probe, &self.profile, &self.matches, catalog),
        }
    }
}

/// Probe the machine and match the catalog against it
pub fn assess(probe: &dyn HardwareProbe, catalog: &ModelCatalog) -> Result<Assessment> {
    let report = probe.probe()?;
    let profile = ResourceProfile::from_report(&report);
    let matches = match_catalog(catalog.models(), &profile);
    Ok(Assessment {
        probe: report,
        profile,
        matches,
    })
}

/// Execute the scan command
pub fn execute(
    probe: &dyn HardwareProbe,
    catalog: &ModelCatalog,
    format: &OutputFormat,
) -> Result<()> {
    let assessment = assess(probe, catalog)?;
    assessment.print(catalog, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::hardware::MockHardwareProbe;

    #[test]
    fn test_assess_uses_probe() {
        let mut probe = MockHardwareProbe::new();
        probe
            .expect_probe()
            .times(1)
            .returning(|| Ok(ProbeReport::new(16, 8)));

        let catalog = ModelCatalog::with_defaults();
        let assessment = assess(&probe, &catalog).unwrap();
        assert_eq!(assessment.profile.max_model_size_gb, 8);
        assert!(!assessment.struggles());
        assert!(assessment
            .matches
            .optimal
            .iter()
            .any(|r| r.name() == "qwen2.5-coder:7b"));
    }

    #[test]
    fn test_assess_fallback_state() {
        let mut probe = MockHardwareProbe::new();
        probe.expect_probe().returning(|| Ok(ProbeReport::new(4, 8)));

        let assessment = assess(&probe, &ModelCatalog::with_defaults()).unwrap();
        assert!(assessment.struggles());
    }

    #[test]
    fn test_assess_propagates_probe_error() {
        let mut probe = MockHardwareProbe::new();
        probe
            .expect_probe()
            .returning(|| Err(AdvisorError::ProbeUnavailable("sysinfo".into())));

        let err = assess(&probe, &ModelCatalog::with_defaults()).unwrap_err();
        assert!(matches!(err, AdvisorError::ProbeUnavailable(_)));
    }
}
