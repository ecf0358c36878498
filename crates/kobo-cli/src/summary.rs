use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use kobo_compare::CountrySummary;
use kobo_model::MatchStage;

use crate::types::CompareResult;

pub fn print_summary(result: &CompareResult) {
    if result.dry_run {
        println!("Dry run: no reports written");
    } else {
        println!("Output: {}", result.output_dir.display());
        println!("Reports written: {}", result.reports.len());
    }
    println!(
        "Countries compared: {} (threshold {}, {:.2?})",
        result.countries_compared, result.threshold, result.elapsed
    );

    if result.summaries.is_empty() {
        println!("No discrepancies found.");
    } else {
        println!("{}", summary_table(&result.summaries));
    }

    if !result.failures.is_empty() {
        eprintln!("Skipped countries:");
        for failure in &result.failures {
            eprintln!(
                "- {} ({}): {}",
                failure.country,
                failure.path.display(),
                failure.reason
            );
        }
    }
}

fn summary_table(summaries: &[CountrySummary]) -> Table {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("Country"),
        header_cell("Records"),
        header_cell("Matched"),
        header_cell("Not matched"),
        header_cell("Missing rows"),
    ];
    header.extend(MatchStage::ALL.iter().map(|stage| header_cell(stage_title(*stage))));
    header.push(header_cell("Below threshold"));
    header.push(header_cell("Unresolved"));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 1..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total = CountrySummaryTotals::default();
    for summary in summaries {
        total.add(summary);
        let mut row = vec![
            Cell::new(summary.country.as_str())
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.records),
            count_cell(summary.matched, Color::Green),
            count_cell(summary.mismatched, Color::Yellow),
            count_cell(summary.missing_rows, Color::Red),
        ];
        row.extend(
            MatchStage::ALL
                .iter()
                .map(|stage| count_cell(summary.resolved(*stage), Color::Blue)),
        );
        row.push(count_cell(summary.best_effort, Color::Magenta));
        row.push(count_cell(summary.unresolved, Color::Red));
        table.add_row(row);
    }

    let mut row = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total.records).add_attribute(Attribute::Bold),
        Cell::new(total.matched).add_attribute(Attribute::Bold),
        Cell::new(total.mismatched).add_attribute(Attribute::Bold),
        Cell::new(total.missing_rows).add_attribute(Attribute::Bold),
    ];
    row.extend(
        total
            .resolved
            .iter()
            .map(|count| Cell::new(count).add_attribute(Attribute::Bold)),
    );
    row.push(Cell::new(total.best_effort).add_attribute(Attribute::Bold));
    row.push(Cell::new(total.unresolved).add_attribute(Attribute::Bold));
    table.add_row(row);
    table
}

#[derive(Default)]
struct CountrySummaryTotals {
    records: usize,
    matched: usize,
    mismatched: usize,
    missing_rows: usize,
    resolved: [usize; 4],
    best_effort: usize,
    unresolved: usize,
}

impl CountrySummaryTotals {
    fn add(&mut self, summary: &CountrySummary) {
        self.records += summary.records;
        self.matched += summary.matched;
        self.mismatched += summary.mismatched;
        self.missing_rows += summary.missing_rows;
        for (slot, stage) in self.resolved.iter_mut().zip(MatchStage::ALL) {
            *slot += summary.resolved(stage);
        }
        self.best_effort += summary.best_effort;
        self.unresolved += summary.unresolved;
    }
}

fn stage_title(stage: MatchStage) -> &'static str {
    match stage {
        MatchStage::Approximate => "Approximate",
        MatchStage::Best => "Best",
        MatchStage::Token => "Token",
        MatchStage::Label => "Label",
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        Cell::new(count).add_attribute(Attribute::Dim)
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
