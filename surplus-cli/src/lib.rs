use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use surplus_solver::{
    LinearMarketModel,
    io::{Scenario, Textbook},
};
use tracing::{Level, event};

mod io;
pub use io::*;

mod config;
pub use config::AppConfig;

// The top-level arguments: where to find configuration, and which subcommand to execute
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "APP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve a scenario and report the solution with its chart data
    Solve {
        #[command(flatten)]
        io: IOArgs,
    },

    /// Solve one of the bundled worked problems
    Textbook {
        /// Which problem
        problem: TextbookArg,

        /// Emit the scenario document instead of solving it
        #[arg(long)]
        scenario: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

// The bundled problems, as named on the command line
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum TextbookArg {
    MonopolySubsidy,
    PriceCeiling,
    SegmentedPricing,
}

impl From<TextbookArg> for Textbook {
    fn from(value: TextbookArg) -> Self {
        match value {
            TextbookArg::MonopolySubsidy => Textbook::MonopolySubsidy,
            TextbookArg::PriceCeiling => Textbook::PriceCeiling,
            TextbookArg::SegmentedPricing => Textbook::SegmentedPricing,
        }
    }
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        let AppConfig { chart, solver } = AppConfig::load(self.config.as_deref())?;
        let model = LinearMarketModel::new(solver);

        match self.command {
            Commands::Solve { io } => {
                let input = io.read()?;
                let scenario = serde_json::from_reader::<_, Scenario>(input)?;
                let report = scenario.solve(&model, &chart)?;
                event!(
                    Level::INFO,
                    scenario = scenario.name(),
                    panels = report.panel_count(),
                    "solved"
                );
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &report)?;
            }
            Commands::Textbook {
                problem,
                scenario,
                output,
            } => {
                let document = Scenario::textbook(problem.into())?;
                let output = output.write()?;
                if scenario {
                    serde_json::to_writer_pretty(output, &document)?;
                } else {
                    let report = document.solve(&model, &chart)?;
                    serde_json::to_writer_pretty(output, &report)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Config file {} does not exist", .0.display())]
    MissingConfig(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::fs;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("surplus-{}-{name}", std::process::id()))
    }

    #[test]
    fn parse_solve() {
        let args = BaseArgs::try_parse_from(["surplus", "solve", "-", "-o", "out.json"]).unwrap();
        let Commands::Solve { io } = args.command else {
            panic!("expected solve");
        };
        assert_eq!(io.input, PathOrStd::Std);
        assert_eq!(io.output.output, PathOrStd::Path("out.json".into()));
    }

    #[rstest]
    #[case::monopoly_subsidy("monopoly-subsidy", Textbook::MonopolySubsidy)]
    #[case::price_ceiling("price-ceiling", Textbook::PriceCeiling)]
    #[case::segmented_pricing("segmented-pricing", Textbook::SegmentedPricing)]
    fn parse_textbook(#[case] name: &str, #[case] expected: Textbook) {
        let args = BaseArgs::try_parse_from(["surplus", "textbook", name]).unwrap();
        let Commands::Textbook {
            problem,
            scenario,
            output,
        } = args.command
        else {
            panic!("expected textbook");
        };
        assert_eq!(Textbook::from(problem), expected);
        assert!(!scenario);
        assert_eq!(output.output, PathOrStd::Std);
    }

    #[test]
    fn rejects_unknown_problem() {
        assert!(BaseArgs::try_parse_from(["surplus", "textbook", "oligopoly"]).is_err());
    }

    #[test]
    fn textbook_scenario_round_trips_through_solve() {
        let scenario = scratch("scenario.json");
        let report = scratch("report.json");

        BaseArgs::try_parse_from([
            "surplus",
            "textbook",
            "price-ceiling",
            "--scenario",
            "-o",
            scenario.to_str().unwrap(),
        ])
        .unwrap()
        .evaluate()
        .unwrap();

        BaseArgs::try_parse_from([
            "surplus",
            "solve",
            scenario.to_str().unwrap(),
            "-o",
            report.to_str().unwrap(),
        ])
        .unwrap()
        .evaluate()
        .unwrap();

        let value =
            serde_json::from_str::<serde_json::Value>(&fs::read_to_string(&report).unwrap())
                .unwrap();
        fs::remove_file(&scenario).unwrap();
        fs::remove_file(&report).unwrap();

        assert_eq!(value["solution"]["kind"], "price_ceiling");
        assert_eq!(value["solution"]["outcome"]["quantity"], 15.0);
        assert_eq!(value["figure"]["panels"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn degenerate_scenario_fails() {
        let input = scratch("degenerate.json");
        fs::write(
            &input,
            r#"{
                "kind": "price_ceiling",
                "demand": { "intercept": 100, "slope": 2 },
                "supply": { "intercept": 10, "slope": 1 },
                "ceiling": 60
            }"#,
        )
        .unwrap();

        let result = BaseArgs::try_parse_from(["surplus", "solve", input.to_str().unwrap()])
            .unwrap()
            .evaluate();
        fs::remove_file(&input).unwrap();

        let err = result.unwrap_err();
        assert!(
            err.downcast_ref::<surplus_solver::MarketError>()
                .is_some_and(|e| matches!(e, surplus_solver::MarketError::NonBindingIntervention { .. }))
        );
    }
}
