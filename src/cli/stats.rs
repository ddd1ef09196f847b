use anyhow::Result;
use ansi_term::{Colour, Style};
use clap::Parser;

use crate::{
    report::analysis::{aggregate_notes, daily_activity, overview, recent_notes, NoteSummary},
    storage::{normalized::NormalizedLog, NormalizedStore},
};

use super::range::RangeArgs;

const RECENT_NOTES: usize = 20;
const BAR_WIDTH: usize = 40;

#[derive(Debug, Parser)]
pub struct StatsCommand {
    #[command(flatten)]
    range: RangeArgs,
}

/// Command to process `stats` command. Prints headline numbers, activity per day and the latest
/// thoughts.
pub async fn process_stats_command(
    store: &NormalizedLog,
    StatsCommand { range }: StatsCommand,
) -> Result<()> {
    let records = range.apply(store.read_all().await?)?;
    if records.is_empty() {
        println!("No data yet. Take some notes and run `happyfruit reprocess`.");
        return Ok(());
    }

    let notes = aggregate_notes(&records);
    let overview = overview(&records, &notes);
    let bold = Style::new().bold();

    println!("{}", bold.paint("Overview"));
    println!("  notes\t\t{}", overview.total_notes);
    println!("  active days\t{}", overview.active_days);
    println!(
        "  top domain\t{}",
        overview.top_domain.as_deref().unwrap_or("-")
    );
    println!(
        "  top activity\t{}",
        overview.top_activity.as_deref().unwrap_or("-")
    );
    println!();

    let days = daily_activity(&notes);
    let max = days.iter().map(|v| v.1).max().unwrap_or(0);
    println!("{}", bold.paint("Daily activity"));
    for (day, count) in &days {
        println!(
            "  {}  {}\t{count}",
            day.format("%m-%d"),
            Colour::Fixed(211).paint(bar(*count, max))
        );
    }
    println!();

    println!("{}", bold.paint("Recent thoughts"));
    for note in recent_notes(&notes, RECENT_NOTES) {
        print_note(note);
    }
    Ok(())
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "▇".repeat((count * BAR_WIDTH).div_ceil(max))
}

fn print_note(note: &NoteSummary) {
    let tags = note
        .categories
        .iter()
        .map(|v| Colour::Green.paint(format!("#{v}")).to_string())
        .chain(
            note.domains
                .iter()
                .map(|v| Colour::Blue.paint(format!("@{v}")).to_string()),
        )
        .collect::<Vec<_>>()
        .join(" ");
    let content = note.thoughts.as_deref().unwrap_or("(no thoughts)");
    println!("  {}  {tags}", note.moment.format("%m-%d %H:%M"));
    for line in content.lines() {
        println!("    {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::bar;

    #[test]
    fn bars_scale_to_busiest_day() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(0, 5), "");
        assert_eq!(bar(5, 5).chars().count(), 40);
        assert_eq!(bar(1, 80).chars().count(), 1);
    }
}
