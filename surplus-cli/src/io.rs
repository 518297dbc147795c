use clap::Args;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::PathBuf,
    str::FromStr,
};

// Subcommands that transform a document share a notion of input and output.
#[derive(Args, Debug)]
pub struct IOArgs {
    /// The scenario JSON file ("-" implies stdin)
    #[arg(value_parser = clap::value_parser!(PathOrStd))]
    pub input: PathOrStd,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl IOArgs {
    pub fn read(&self) -> anyhow::Result<Box<dyn Read>> {
        match &self.input {
            PathOrStd::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            PathOrStd::Std => Ok(Box::new(stdin().lock())),
        }
    }

    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        self.output.write()
    }
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// The output file ("-" implies stdout)
    #[arg(short, long, default_value = "-", value_parser = clap::value_parser!(PathOrStd))]
    pub output: PathOrStd,
}

impl OutputArgs {
    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        match &self.output {
            PathOrStd::Path(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
            PathOrStd::Std => Ok(Box::new(stdout().lock())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathOrStd {
    Path(PathBuf),
    Std,
}

impl FromStr for PathOrStd {
    type Err = <PathBuf as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Self::Std)
        } else {
            Ok(Self::Path(s.parse()?))
        }
    }
}
