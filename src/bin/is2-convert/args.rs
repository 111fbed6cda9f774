use anyhow::Result;
use clap::value_t_or_exit;
use is2::{arg, args_parser, opt, CalibrationParams, ScaleRange};
use std::{ffi::OsString, path::PathBuf};

pub struct Args {
    pub inputs: Vec<PathBuf>,
    pub ir_output: String,
    pub visual_output: String,
    pub background: f64,
    pub emissivity: f64,
    pub min: f64,
    pub max: f64,
    pub is_json: bool,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        Self::from_args(std::env::args_os())
    }

    pub fn from_args<I, T>(args: I) -> Result<Args>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = args_parser!("is2-convert")
            .setting(clap::AppSettings::AllowLeadingHyphen)
            .about("Convert IS2 thermal camera files to infrared and visual images.")
            .arg(
                opt!("ir output")
                    .short("o")
                    .default_value("ir.jpg")
                    .empty_values(true)
                    .help("Infrared image path or directory; empty to skip"),
            )
            .arg(
                opt!("visual output")
                    .short("v")
                    .default_value("vis.jpg")
                    .empty_values(true)
                    .help("Visual image path or directory; empty to skip"),
            )
            .arg(
                opt!("background")
                    .short("b")
                    .default_value("20")
                    .help("Background (reflected) temperature in celsius"),
            )
            .arg(
                opt!("emissivity")
                    .short("e")
                    .default_value("0.95")
                    .help("Emissivity of the target, in (0, 1]"),
            )
            .arg(
                opt!("min")
                    .default_value("20")
                    .help("Lower bound of the colour scale (0 with --max 0: automatic)"),
            )
            .arg(
                opt!("max")
                    .default_value("70")
                    .help("Upper bound of the colour scale"),
            )
            .arg(
                opt!("json")
                    .short("j")
                    .takes_value(false)
                    .help("Print a JSON report per converted file"),
            )
            .arg(
                arg!("inputs")
                    .required(true)
                    .multiple(true)
                    .help("IS2 files (positional, there is no input flag)"),
            )
            .get_matches_from(args);

        let inputs = matches
            .values_of("inputs")
            .unwrap()
            .map(|f| f.into())
            .collect();
        let ir_output = matches.value_of("ir output").unwrap_or_default().to_string();
        let visual_output = matches.value_of("visual output").unwrap_or_default().to_string();
        let background = value_t_or_exit!(matches, "background", f64);
        let emissivity = value_t_or_exit!(matches, "emissivity", f64);
        let min = value_t_or_exit!(matches, "min", f64);
        let max = value_t_or_exit!(matches, "max", f64);
        let is_json = matches.is_present("json");

        Ok(Args {
            inputs,
            ir_output,
            visual_output,
            background,
            emissivity,
            min,
            max,
            is_json,
        })
    }

    pub fn calibration(&self) -> Result<CalibrationParams> {
        Ok(CalibrationParams::new(
            self.background,
            self.emissivity,
            ScaleRange::from_bounds(self.min, self.max),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() -> Result<()> {
        let args = Args::from_args(vec!["is2-convert", "IR_0001.IS2"])?;
        assert_eq!(args.inputs, vec![PathBuf::from("IR_0001.IS2")]);
        assert_eq!(args.ir_output, "ir.jpg");
        assert_eq!(args.visual_output, "vis.jpg");
        assert_eq!((args.background, args.emissivity), (20., 0.95));
        assert_eq!((args.min, args.max), (20., 70.));
        assert!(!args.is_json);
        Ok(())
    }

    #[test]
    fn short_flags() -> Result<()> {
        let args = Args::from_args(vec![
            "is2-convert", "-o", "out/ir.jpg", "-v", "", "-b", "-5", "--min", "0", "--max", "0",
            "-j", "a.is2", "b.IS2",
        ])?;
        assert_eq!(args.ir_output, "out/ir.jpg");
        assert_eq!(args.visual_output, "");
        assert_eq!(args.background, -5.);
        assert_eq!(args.inputs.len(), 2);
        assert!(args.is_json);
        assert_eq!(args.calibration()?.scale(), ScaleRange::Auto);
        Ok(())
    }
}
