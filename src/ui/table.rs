use std::cmp::Ordering;

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{PenguinDataset, TABLE_COLUMNS, cell_text};
use crate::outputs::{TableKind, TableView};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;
const TABLE_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Grid sort / page state
// ---------------------------------------------------------------------------

/// Local view state of the data grid. Not a reactive input: it only changes
/// which slice of the artifact is drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    /// Sorted column index into [`TABLE_COLUMNS`] and ascending flag.
    pub sort: Option<(usize, bool)>,
    pub page: usize,
}

impl GridState {
    /// Header click: sort ascending, then descending, then unsorted.
    pub fn click_header(&mut self, column: usize) {
        self.sort = match self.sort {
            Some((c, true)) if c == column => Some((column, false)),
            Some((c, false)) if c == column => None,
            _ => Some((column, true)),
        };
        self.page = 0;
    }
}

/// Row order for the grid. Missing values sort last in either direction.
pub fn sorted_rows(dataset: &PenguinDataset, sort: Option<(usize, bool)>) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..dataset.len()).collect();
    let Some((column, ascending)) = sort else {
        return rows;
    };
    rows.sort_by(|&a, &b| {
        let (pa, pb) = (&dataset.rows[a], &dataset.rows[b]);
        match column {
            0 => cmp_missing_last(Some(pa.species), Some(pb.species), ascending),
            1 => cmp_missing_last(Some(&pa.island), Some(&pb.island), ascending),
            2 => cmp_missing_last(pa.bill_length_mm, pb.bill_length_mm, ascending),
            3 => cmp_missing_last(pa.bill_depth_mm, pb.bill_depth_mm, ascending),
            4 => cmp_missing_last(pa.flipper_length_mm, pb.flipper_length_mm, ascending),
            5 => cmp_missing_last(pa.body_mass_g, pb.body_mass_g, ascending),
            6 => cmp_missing_last(pa.sex, pb.sex, ascending),
            7 => cmp_missing_last(pa.year, pb.year, ascending),
            _ => Ordering::Equal,
        }
    });
    rows
}

fn cmp_missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if ascending { ord } else { ord.reverse() }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Number of pages needed for `rows` at `page_size` (at least one).
pub fn page_count(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1)).max(1)
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw a table artifact.
pub fn table_view(ui: &mut Ui, id: &str, view: &TableView, grid: &mut GridState) {
    match view.kind {
        TableKind::Table => {
            let rows: Vec<usize> = (0..view.dataset.len()).collect();
            ui.push_id(id, |ui: &mut Ui| {
                draw_rows(ui, &view.dataset, &rows, None);
            });
        }
        TableKind::Grid { page_size } => data_grid(ui, id, &view.dataset, page_size, grid),
    }
}

fn data_grid(
    ui: &mut Ui,
    id: &str,
    dataset: &PenguinDataset,
    page_size: usize,
    grid: &mut GridState,
) {
    let order = sorted_rows(dataset, grid.sort);
    let pages = page_count(order.len(), page_size);
    grid.page = grid.page.min(pages - 1);

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(grid.page > 0, egui::Button::new("◀ Prev"))
            .clicked()
        {
            grid.page -= 1;
        }
        ui.label(format!("Page {} of {pages}", grid.page + 1));
        if ui
            .add_enabled(grid.page + 1 < pages, egui::Button::new("Next ▶"))
            .clicked()
        {
            grid.page += 1;
        }
        ui.label(format!("{} rows", order.len()));
    });

    let start = (grid.page * page_size).min(order.len());
    let end = (start + page_size).min(order.len());
    let mut clicked = None;
    ui.push_id(id, |ui: &mut Ui| {
        clicked = draw_rows(ui, dataset, &order[start..end], Some(grid.sort));
    });
    if let Some(column) = clicked {
        grid.click_header(column);
    }
}

/// Draw `rows` in table form. With `sort` set, headers are clickable and the
/// clicked column index is returned.
fn draw_rows(
    ui: &mut Ui,
    dataset: &PenguinDataset,
    rows: &[usize],
    sort: Option<Option<(usize, bool)>>,
) -> Option<usize> {
    let mut clicked = None;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), TABLE_COLUMNS.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(TABLE_HEIGHT)
        .header(HEADER_HEIGHT, |mut header| {
            for (c, name) in TABLE_COLUMNS.iter().enumerate() {
                header.col(|ui: &mut Ui| match sort {
                    Some(current) => {
                        let arrow = match current {
                            Some((sc, true)) if sc == c => " ⏶",
                            Some((sc, false)) if sc == c => " ⏷",
                            _ => "",
                        };
                        if ui.button(format!("{name}{arrow}")).clicked() {
                            clicked = Some(c);
                        }
                    }
                    None => {
                        ui.strong(*name);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let p = &dataset.rows[rows[row.index()]];
                for c in 0..TABLE_COLUMNS.len() {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell_text(p, c));
                    });
                }
            });
        });
    clicked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::reference_dataset;

    #[test]
    fn test_header_click_cycles() {
        let mut grid = GridState { sort: None, page: 3 };
        grid.click_header(5);
        assert_eq!(grid, GridState { sort: Some((5, true)), page: 0 });
        grid.click_header(5);
        assert_eq!(grid.sort, Some((5, false)));
        grid.click_header(5);
        assert_eq!(grid.sort, None);
        grid.click_header(2);
        grid.click_header(4);
        assert_eq!(grid.sort, Some((4, true)));
    }

    #[test]
    fn test_sort_numeric_missing_last() {
        let ds = reference_dataset();
        for ascending in [true, false] {
            let order = sorted_rows(&ds, Some((5, ascending)));
            assert_eq!(order.len(), 344);
            let masses: Vec<Option<f64>> = order.iter().map(|&i| ds.rows[i].body_mass_g).collect();
            assert!(masses[341..].iter().all(|m| m.is_none()));
            let present: Vec<f64> = masses[..341].iter().map(|m| m.unwrap()).collect();
            if ascending {
                assert!(present.windows(2).all(|w| w[0] <= w[1]));
            } else {
                assert!(present.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }

    #[test]
    fn test_unsorted_keeps_source_order() {
        let ds = reference_dataset();
        assert_eq!(sorted_rows(&ds, None), (0..344).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(344, 25), 14);
        assert_eq!(page_count(0, 25), 1);
        assert_eq!(page_count(25, 25), 1);
    }
}
