use anyhow::Result;
use ansi_term::{Colour, Style};
use clap::Parser;
use serde_json::json;

use crate::{
    report::{
        bucketing::Granularity,
        build_heatmaps,
        heatmap::{Facet, Heatmap, HeatmapMatrix},
    },
    storage::{normalized::NormalizedLog, NormalizedStore},
};

use super::range::RangeArgs;

const SHADES: [char; 4] = ['░', '▒', '▓', '█'];
const EMPTY_CELL: char = '·';

#[derive(Debug, Parser)]
pub struct HeatmapCommand {
    #[command(flatten)]
    range: RangeArgs,
    #[arg(
        short,
        long,
        help = "Show only one facet. By default domain, action and category are shown"
    )]
    facet: Option<Facet>,
    #[arg(
        short,
        long,
        help = "Force the column size instead of picking it from the length of the range"
    )]
    granularity: Option<Granularity>,
    #[arg(long, help = "Print the count matrices as json")]
    json: bool,
}

/// Command to process `heatmap` command. Prints how often every tag was used over time.
pub async fn process_heatmap_command(
    store: &NormalizedLog,
    HeatmapCommand {
        range,
        facet,
        granularity,
        json,
    }: HeatmapCommand,
) -> Result<()> {
    let records = range.apply(store.read_all().await?)?;
    let facets = match facet {
        Some(facet) => vec![facet],
        None => vec![Facet::Domain, Facet::Action, Facet::Category],
    };

    let heatmaps = build_heatmaps(&records, &facets, granularity);

    if json {
        let values = heatmaps
            .iter()
            .map(|(facet, heatmap)| match heatmap {
                Heatmap::Matrix(matrix) => serde_json::to_value(matrix),
                Heatmap::NoData => Ok(json!({ "facet": facet, "no_data": true })),
            })
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No data yet. Take some notes and run `happyfruit reprocess`.");
        return Ok(());
    }

    for (facet, heatmap) in heatmaps {
        match heatmap {
            Heatmap::Matrix(matrix) => print_matrix(&matrix),
            Heatmap::NoData => println!("{}\n  no {facet} tags in this period\n", title(facet)),
        }
    }
    Ok(())
}

fn title(facet: Facet) -> String {
    let text = match facet {
        Facet::Domain => "Recent domains",
        Facet::Action => "Recent actions",
        Facet::Category => "Recently busy with",
    };
    Style::new().bold().paint(text).to_string()
}

fn colour(facet: Facet) -> Colour {
    match facet {
        Facet::Domain => Colour::Blue,
        Facet::Action => Colour::Fixed(208),
        Facet::Category => Colour::Green,
    }
}

/// Picks a shade for a cell. Any non zero count gets at least the lightest shade.
fn shade(count: u32, max: u32) -> Option<char> {
    if count == 0 || max == 0 {
        return None;
    }
    let level = (count as usize * SHADES.len()).div_ceil(max as usize);
    Some(SHADES[level.clamp(1, SHADES.len()) - 1])
}

fn print_matrix(matrix: &HeatmapMatrix) {
    println!("{}", title(matrix.facet));
    let max = matrix.max_count();
    let paint = colour(matrix.facet);

    // Rows are kept least active first, the busiest one goes on top.
    for row in matrix.rows.iter().rev() {
        let cells = row
            .counts
            .iter()
            .map(|count| match shade(*count, max) {
                Some(v) => paint.paint(v.to_string()).to_string(),
                None => Colour::Fixed(240).paint(EMPTY_CELL.to_string()).to_string(),
            })
            .collect::<String>();
        println!("  {cells}  {}\t{}", row.total, row.label);
    }
    println!(
        "  from: {} ~ to: {} {}\n",
        matrix.first_label, matrix.last_label, matrix.granularity
    );
}
