use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rusty_lens::data::Operator;
use rusty_lens::state::AppState;
use rusty_lens::viz::ChartKind;

// ---------------------------------------------------------------------------
// Left side panel – dataset list and filter form
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Datasets");
    ui.separator();

    if state.store.is_empty() {
        ui.label("Drop CSV or XLSX files here, or use File → Open…");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let entries: Vec<(String, usize)> = state
        .store
        .iter()
        .map(|(name, ds)| (name.clone(), ds.len()))
        .collect();

    ScrollArea::vertical()
        .id_salt("dataset_list")
        .max_height(ui.available_height() * 0.5)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for (name, rows) in &entries {
                let is_selected = state.selected.contains(name);
                if ui
                    .selectable_label(is_selected, format!("{name}  ({rows} rows)"))
                    .clicked()
                {
                    state.toggle_selection(name);
                }
            }
        });

    ui.add_space(8.0);
    ui.heading("Filter");
    ui.separator();
    filter_form(ui, state);
}

fn filter_form(ui: &mut Ui, state: &mut AppState) {
    let columns = state.store.union_columns();

    ui.strong("Column");
    egui::ComboBox::from_id_salt("filter_column")
        .selected_text(state.filter_form.column.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                ui.selectable_value(&mut state.filter_form.column, col.clone(), col.as_str());
            }
        });

    ui.strong("Operator");
    egui::ComboBox::from_id_salt("filter_operator")
        .selected_text(state.filter_form.operator.symbol())
        .show_ui(ui, |ui: &mut Ui| {
            for op in Operator::ALL {
                ui.selectable_value(&mut state.filter_form.operator, op, op.symbol());
            }
        });

    ui.strong("Value");
    ui.text_edit_singleline(&mut state.filter_form.value);

    ui.add_space(4.0);
    let can_apply = !state.filter_form.column.is_empty();
    if ui
        .add_enabled(can_apply, egui::Button::new("Apply Filter"))
        .clicked()
    {
        // Errors land in the status line.
        if let Ok(outcomes) = state.apply_filter() {
            log::debug!("Filter outcomes: {outcomes:?}");
        }
    }
}

// ---------------------------------------------------------------------------
// Right side panel – visualization options
// ---------------------------------------------------------------------------

pub fn viz_options(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Visualization");
    ui.separator();

    ui.strong("Type");
    let mut kind = state.chart_kind;
    egui::ComboBox::from_id_salt("chart_kind")
        .selected_text(kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for k in ChartKind::ALL {
                ui.selectable_value(&mut kind, k, k.label());
            }
        });
    state.set_chart_kind(kind);

    ui.add_space(8.0);
    if ui
        .add_enabled(state.figure().is_some(), egui::Button::new("Export Graph"))
        .clicked()
    {
        export_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export graph…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.label(format!(
            "{} dataset(s) loaded, {} selected",
            state.store.len(),
            state.selected.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open datasets")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    if let Some(paths) = files {
        state.load_paths(&paths);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export Graph")
        .add_filter("PNG Files", &["png"])
        .add_filter("SVG Files", &["svg"])
        .set_file_name("figure.png")
        .save_file();

    if let Some(path) = file {
        // Errors land in the status line.
        let _ = state.export(&path);
    }
}
