mod args;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::ParallelProgressIterator;
use is2::{
    cli::{progress_bar, resolve_output, Artifact},
    convert, logger, Conversion,
};
use tracing::info;

use crate::args::Args;

fn main() -> Result<()> {
    logger::init();
    let args = Args::from_cmd_line()?;
    let params = args.calibration()?;

    if args.inputs.len() > 1 {
        for output in [&args.ir_output, &args.visual_output].iter() {
            if !output.is_empty() && !Path::new(output.as_str()).is_dir() {
                bail!(
                    "output `{}` must be an existing directory when converting several files",
                    output
                );
            }
        }
    }

    let convert_one = |input: &PathBuf| -> Result<()> {
        let mut request = Conversion::new(input).params(params);
        request.ir_output = resolve_output(input, &args.ir_output, Artifact::Infrared);
        request.visual_output = resolve_output(input, &args.visual_output, Artifact::Visual);

        let report =
            convert(&request).with_context(|| format!("could not convert {}", input.display()))?;
        if args.is_json {
            println!("{}", serde_json::to_string(&report)?);
        }
        Ok(())
    };

    use rayon::prelude::*;
    let count = args
        .inputs
        .par_iter()
        .progress_with(progress_bar(args.inputs.len() as u64))
        .map(convert_one)
        .try_fold(
            || 0usize,
            |acc, res| -> Result<_> {
                res?;
                Ok(acc + 1)
            },
        )
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    info!(count, "converted images");
    Ok(())
}
