extern crate rem;

use clap::Parser;
use rem::output::FileOutput;
use rem::segments::{segment_handler, SegmentKind};
use rem::{
    ingest_for_processing, run_assessment, run_compliance, write_assessment_report,
    AssessmentContext, SegmentReport, DEFAULT_OUTDOOR_TEMP_C,
};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct RemArgs {
    /// Project JSON file (building + scenarios + outdoor temperature).
    /// Omit when assessing a built-in segment registry with --segment.
    input_file: Option<String>,
    /// Built-in segment to assess: university_he, commercial_landlord,
    /// smb_industrial or individual_selfbuild.
    #[arg(long, short)]
    segment: Option<String>,
    /// Outdoor temperature supplied to the engine, °C.
    #[arg(long, short = 't', default_value_t = DEFAULT_OUTDOOR_TEMP_C)]
    outdoor_temp: f64,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = RemArgs::parse();

    let (reports, output_stem) = match (&args.input_file, &args.segment) {
        (Some(input_file), None) => {
            let input = ingest_for_processing(BufReader::new(File::open(input_file)?))?;
            let results = run_assessment(&input.building, &input.scenarios, input.outdoor_temp_c)?;
            let annual_energy_kwh = input.building.baseline_energy_mwh * 1_000.;
            let compliance = run_compliance(
                &input.building,
                annual_energy_kwh,
                &[
                    rem::segments::ComplianceCheck::Epc,
                    rem::segments::ComplianceCheck::Mees,
                    rem::segments::ComplianceCheck::PartL,
                    rem::segments::ComplianceCheck::Secr,
                ],
            )?;
            let building_name = if input.building.description.is_empty() {
                input.building.building_type.clone()
            } else {
                input.building.description.clone()
            };
            let reports = vec![SegmentReport {
                segment: None,
                building: building_name,
                results,
                compliance,
            }];
            (reports, file_stem(input_file).to_string())
        }
        (None, Some(segment_id)) => {
            let segment = SegmentKind::from_id(segment_id)
                .ok_or_else(|| anyhow::anyhow!("unknown segment id \"{segment_id}\""))?;
            let handler = segment_handler(segment);
            let mut reports = Vec::new();
            for building_name in handler.building_registry().keys() {
                let context = AssessmentContext {
                    segment,
                    building: building_name.clone(),
                    scenarios: handler
                        .scenario_whitelist()
                        .iter()
                        .map(|name| name.to_string())
                        .collect(),
                    outdoor_temp_c: args.outdoor_temp,
                };
                reports.push(context.run()?);
            }
            (reports, segment_id.clone())
        }
        _ => anyhow::bail!("provide either a project JSON file or --segment, not both"),
    };

    let output = FileOutput::new(PathBuf::from("."), format!("{output_stem}__{{}}"));
    write_assessment_report(&output, &reports)?;
    println!("{}", serde_json::to_string_pretty(&reports)?);

    Ok(())
}

fn file_stem(input_file: &str) -> &str {
    let extension = Path::new(input_file).extension().and_then(OsStr::to_str);
    match extension {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    }
}
