//! Text input with a suggestion list and a "Show" button

use egui::{Color32, Frame, Key, RichText, TextEdit, Ui};

use crate::autocomplete::{AutoComplete, AutoCompleteEvent, AutoCompleteKey};

const ACTIVE_FILL: Color32 = Color32::from_rgb(60, 60, 80);

#[derive(Debug, Default)]
pub struct AutoCompleteWidget {
    model: AutoComplete,
    buffer: String,
}

impl AutoCompleteWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &AutoComplete {
        &self.model
    }

    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        self.model.set_candidates(candidates);
    }

    pub fn reset(&mut self) {
        self.model.reset();
        self.buffer.clear();
    }

    /// Returns the event produced by Enter, a suggestion click or "Show"
    pub fn ui(&mut self, ui: &mut Ui, hint: &str) -> Option<AutoCompleteEvent> {
        let mut event = None;

        ui.horizontal(|ui| {
            let response = ui.add(
                TextEdit::singleline(&mut self.buffer)
                    .hint_text(hint)
                    .desired_width(ui.available_width() - 60.0),
            );
            if response.changed() {
                self.model.set_input(self.buffer.clone());
            }

            if response.has_focus() || response.lost_focus() {
                let (up, down, enter) = ui.input(|i| {
                    (
                        i.key_pressed(Key::ArrowUp),
                        i.key_pressed(Key::ArrowDown),
                        i.key_pressed(Key::Enter),
                    )
                });
                if up {
                    self.model.key(AutoCompleteKey::Up);
                }
                if down {
                    self.model.key(AutoCompleteKey::Down);
                }
                if enter {
                    event = self.model.key(AutoCompleteKey::Enter);
                }
            }

            if ui.button("Show").clicked() {
                event = Some(self.model.submit());
            }
        });

        if self.model.is_open() {
            let active = self.model.active();
            let mut picked = None;
            Frame::popup(ui.style()).show(ui, |ui| {
                for (i, suggestion) in self.model.suggestions().enumerate() {
                    let fill = if active == Some(i) {
                        ACTIVE_FILL
                    } else {
                        Color32::TRANSPARENT
                    };
                    let clicked = Frame::none()
                        .fill(fill)
                        .show(ui, |ui| ui.selectable_label(false, RichText::new(suggestion)).clicked())
                        .inner;
                    if clicked {
                        picked = Some(i);
                    }
                }
            });
            if let Some(i) = picked {
                event = self.model.select(i);
            }
        }

        if let Some(AutoCompleteEvent::Committed(text)) = &event {
            self.buffer = text.clone();
        }
        event
    }
}
