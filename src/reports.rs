use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use drillrank::model::{DrillSchema, RankedPlayer};
use drillrank::presets::Preset;

pub fn print_ranking_table(results: &[RankedPlayer], drills: &[DrillSchema], grouped: bool) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Player").add_attribute(Attribute::Bold),
    ];
    if grouped {
        header.push(Cell::new("Group"));
    }
    for d in drills {
        let label = if d.unit.is_empty() {
            d.label.clone()
        } else {
            format!("{}\n({})", d.label, d.unit)
        };
        header.push(Cell::new(label));
    }
    header.push(Cell::new("Score").fg(Color::Cyan).add_attribute(Attribute::Bold));
    table.add_row(header);

    let numeric_from = if grouped { 3 } else { 2 };
    for i in numeric_from..numeric_from + drills.len() + 1 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in results {
        let name = if r.player.name.is_empty() {
            r.player.id.clone()
        } else {
            r.player.name.clone()
        };

        let mut row = vec![Cell::new(r.rank), Cell::new(name)];
        if grouped {
            row.push(Cell::new(r.player.group_key()));
        }
        for d in drills {
            row.push(match r.player.drill_value(&d.key) {
                Some(v) => Cell::new(format!("{:.1}", v)),
                None => Cell::new("-"),
            });
        }
        let score_cell = Cell::new(format!("{:.1}", r.composite_score)).fg(Color::Cyan);
        row.push(if r.rank == 1 {
            score_cell.add_attribute(Attribute::Bold)
        } else {
            score_cell
        });
        table.add_row(row);
    }
    println!("\n{}", table);
}

pub fn print_presets_table(presets: &[Preset]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Preset").add_attribute(Attribute::Bold),
        Cell::new("Description"),
        Cell::new("Weights"),
    ]);

    for p in presets {
        let weights = p
            .weights
            .iter()
            .map(|(k, v)| format!("{}={:.0}", k, v * 100.0))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&p.name).add_attribute(Attribute::Bold),
            Cell::new(&p.description),
            Cell::new(weights),
        ]);
    }
    println!("\n{}", table);
}
