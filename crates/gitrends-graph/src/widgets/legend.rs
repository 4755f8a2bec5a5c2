use egui::{Color32, Sense, Ui, Vec2};

const SWATCH: f32 = 12.0;

/// Swatch and label per category, wrapped to the available width
pub fn legend_ui(ui: &mut Ui, entries: &[(String, Color32)]) {
    ui.horizontal_wrapped(|ui| {
        for (label, color) in entries {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(SWATCH), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, *color);
            ui.label(label);
            ui.add_space(8.0);
        }
    });
}
