#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::pedantic)]
#![allow(warnings)]

use plotters::prelude::*;
use probelab::{
    OpenAddressingTable, ProbeStrategy, TableReport, TwinPrimeFinder, dump, random_keys,
    timestamp_keys, word_keys,
};
use std::env;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter};

// The classic experiment range: the scan lands on the (95789, 95791) pair.
const TWIN_RANGE_FROM: u64 = 95_500;
const TWIN_RANGE_TO: u64 = 96_000;
const PRIME_ROUNDS: u32 = 5;

// Load factors swept when no single one is requested.
const LOAD_FACTORS: [f64; 8] = [0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 0.98, 0.99];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut finder = TwinPrimeFinder::new(PRIME_ROUNDS);
    let Some(table_size) = finder.find_larger_twin_prime(TWIN_RANGE_FROM, TWIN_RANGE_TO) else {
        return Err(format!(
            "no twin prime between {TWIN_RANGE_FROM} and {TWIN_RANGE_TO}"
        )
        .into());
    };
    let table_size = table_size as usize;
    println!("\nA good table size is found: {table_size}");

    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        // No arguments: sweep all load factors with random keys and plot.
        [] => sweep(table_size),
        [source, load_factor] => single_run(table_size, source, load_factor, 0),
        [source, load_factor, debug] => {
            let debug: u32 = debug.parse().map_err(|_| usage("debug level should be a number"))?;
            if debug > 1 {
                return Err(usage("debug level should be 0 or 1").into());
            }
            single_run(table_size, source, load_factor, debug)
        }
        _ => Err(usage("wrong number of arguments").into()),
    }
}

/// Runs linear and double hashing across the whole load factor sweep and
/// renders the probe cost comparison chart.
fn sweep(table_size: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("Data Source Type: Integer:rand::rng()");

    let mut linear_curve: Vec<(f64, f64)> = Vec::new();
    let mut double_curve: Vec<(f64, f64)> = Vec::new();

    for &load_factor in &LOAD_FACTORS {
        let target = (load_factor * table_size as f64).ceil() as usize;
        log::info!("running load factor {load_factor} ({target} distinct keys)");

        let (linear, double) = run_pair(table_size, target, random_keys(rand::rng()))?;
        let linear_report = TableReport::from_table(&linear);
        let double_report = TableReport::from_table(&double);
        println!("\n\n{linear_report}");
        println!("\n\n{double_report}");

        linear_curve.push((load_factor, linear_report.average_probes));
        double_curve.push((load_factor, double_report.average_probes));
    }

    plot_probe_costs(&linear_curve, &double_curve)?;
    println!("\nGenerated plot image: average_probes.png");
    Ok(())
}

/// Runs one load factor with the requested key source, optionally
/// writing the table dumps.
fn single_run(
    table_size: usize,
    source: &str,
    load_factor: &str,
    debug: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let load_factor: f64 =
        load_factor.parse().map_err(|_| usage("load factor should be a number"))?;
    if load_factor <= 0.0 || load_factor >= 1.0 {
        return Err(usage("load factor should be less than 1 and greater than zero").into());
    }
    let target = (load_factor * table_size as f64).ceil() as usize;

    match source {
        "1" => {
            println!("Data Source Type: Integer:rand::rng()");
            report_pair(table_size, target, random_keys(rand::rng()), debug)
        }
        "2" => {
            println!("Data Source Type: Long:SystemTime::now()");
            report_pair(table_size, target, timestamp_keys(), debug)
        }
        "3" => {
            println!("Data Source Type: String:File Name -> word-list");
            let reader = BufReader::new(File::open("word-list").map_err(|_| usage("file not found"))?);
            report_pair(table_size, target, word_keys(reader), debug)
        }
        _ => Err(usage("input type should be 1, 2, or 3").into()),
    }
}

/// Feeds one key stream into a linear and a double hashing table in
/// lockstep until both reach the target distinct count.
fn run_pair<T, I>(
    table_size: usize,
    target: usize,
    keys: I,
) -> Result<(OpenAddressingTable<T>, OpenAddressingTable<T>), Box<dyn std::error::Error>>
where
    T: probelab::KeyHash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut linear = OpenAddressingTable::new(table_size, ProbeStrategy::Linear)?;
    let mut double = OpenAddressingTable::new(table_size, ProbeStrategy::Double)?;
    for key in keys {
        if linear.total_inserts() >= target && double.total_inserts() >= target {
            break;
        }
        linear.insert(key.clone());
        double.insert(key);
    }
    Ok((linear, double))
}

/// Runs one pair, prints both summaries and writes the dump files at
/// debug level 1.
fn report_pair<T, I>(
    table_size: usize,
    target: usize,
    keys: I,
    debug: u32,
) -> Result<(), Box<dyn std::error::Error>>
where
    T: probelab::KeyHash + Eq + Clone + Display,
    I: IntoIterator<Item = T>,
{
    let (linear, double) = run_pair(table_size, target, keys)?;
    println!("\n\n{}", TableReport::from_table(&linear));
    println!("\n\n{}", TableReport::from_table(&double));

    if debug == 1 {
        write_dump(&linear, "linear-dump")?;
        write_dump(&double, "double-dump")?;
        println!("\nWrote linear-dump and double-dump");
    }
    Ok(())
}

fn write_dump<T: Display>(
    table: &OpenAddressingTable<T>,
    file_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("writing {file_name}");
    let mut writer = BufWriter::new(File::create(file_name)?);
    dump(table, &mut writer)?;
    Ok(())
}

/// Draws average probes against load factor for both strategies.
fn plot_probe_costs(
    linear_curve: &[(f64, f64)],
    double_curve: &[(f64, f64)],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let line_width = 2;
    let marker_size = 4;
    let text_size = 16;
    let title_size = 35;

    let colors = [
        RGBColor(220, 50, 50), // Linear: bright red
        RGBColor(50, 90, 220), // Double: bright blue
    ];

    let root = BitMapBackend::new("average_probes.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_avg = linear_curve
        .iter()
        .chain(double_curve.iter())
        .fold(0.0, |max, &(_, y)| if y > max { y } else { max }) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Linear vs Double Hashing Probe Cost", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0.45_f64..1.0_f64, 0.0..max_avg)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc("Average Probes per Insertion")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    for (series, name, color) in [
        (linear_curve, "Linear", &colors[0]),
        (double_curve, "Double", &colors[1]),
    ] {
        let line_style = ShapeStyle::from(color).stroke_width(line_width);
        chart
            .draw_series(LineSeries::new(series.iter().copied(), line_style))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            series.iter().map(|&point| Circle::new(point, marker_size, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

/// Prints the usage block and returns the failure message.
fn usage(message: &str) -> String {
    println!("Usage: $ load_factor <input type> <load factor> [debug level]");
    println!(
        "<input type> 1, 2, or 3 \n 1: rand::rng() \n 2: SystemTime::now() \n 3: word-list."
    );
    println!("<load factor> any number greater than 0 and less than 1, e.g. 0.5 or 0.95");
    println!(
        "optional <debug level> \n 0: print summary of experiment on the console \
         \n 1: also write the hash tables into two files linear-dump and double-dump."
    );
    println!("With no arguments, all load factors {LOAD_FACTORS:?} are swept and plotted.");
    message.to_string()
}
