use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Color32, Context, FontFamily, FontId, Margin, RichText, Stroke, Vec2, Visuals};
use egui_extras::{Column, TableBuilder};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::error::{LoadError, LoadResult};
use crate::format::{Cell, Sign};
use crate::loader::{HttpProvider, Loader};
use crate::model::{Record, SortDirection, SortKey};
use crate::view::{BoardView, ViewEvent, ViewState};

const GAIN: Color32 = Color32::from_rgb(110, 220, 120);
const LOSS: Color32 = Color32::from_rgb(240, 100, 100);
const HEADER: Color32 = Color32::from_rgb(190, 200, 215);
const ACCENT: Color32 = Color32::from_rgb(235, 175, 60);

pub fn set_custom_style(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(18, 20, 24);
    visuals.window_fill = Color32::from_rgb(24, 27, 32);
    visuals.extreme_bg_color = Color32::from_rgb(30, 34, 40);
    visuals.faint_bg_color = Color32::from_rgb(26, 29, 35);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(38, 43, 51);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(60, 66, 76));
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 58, 68);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, ACCENT);
    visuals.widgets.active.bg_fill = Color32::from_rgb(64, 70, 82);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, ACCENT);

    visuals.selection.bg_fill = Color32::from_rgb(80, 64, 30);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(14.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(20.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        FontId::new(13.0, FontFamily::Monospace),
    );

    ctx.set_style(style);
}

fn sign_color(sign: Option<Sign>) -> Option<Color32> {
    match sign {
        Some(Sign::Positive) => Some(GAIN),
        Some(Sign::Negative) => Some(LOSS),
        Some(Sign::Neutral) | None => None,
    }
}

fn cell_text(cell: &Cell) -> RichText {
    let text = RichText::new(&cell.text);
    match sign_color(cell.sign) {
        Some(c) => text.color(c),
        None => text,
    }
}

fn column_width(key: SortKey) -> Column {
    match key {
        SortKey::ItemName => Column::remainder().at_least(220.0).clip(true),
        SortKey::Source => Column::exact(100.0).clip(true),
        SortKey::Quantity => Column::exact(60.0),
        SortKey::PercentChange => Column::exact(90.0),
        SortKey::UpdatedAt => Column::exact(190.0),
        _ => Column::exact(115.0),
    }
}

pub struct PriceBoardApp {
    state: ViewState,
    board: BoardView,
    query_input: String,

    runtime: Runtime,
    loader: Arc<Loader<HttpProvider>>,
    pending: Option<oneshot::Receiver<LoadResult<Vec<Record>>>>,

    refresh_every: Option<Duration>,
    last_load: Option<Instant>,
}

impl PriceBoardApp {
    pub fn new(
        ctx: &Context,
        runtime: Runtime,
        loader: Loader<HttpProvider>,
        refresh_every: Option<Duration>,
    ) -> Self {
        let state = ViewState::default();
        let board = state.project();
        let mut app = Self {
            state,
            board,
            query_input: String::new(),
            runtime,
            loader: Arc::new(loader),
            pending: None,
            refresh_every,
            last_load: None,
        };
        app.start_load(ctx);
        app
    }

    fn dispatch(&mut self, event: ViewEvent) {
        self.state = std::mem::take(&mut self.state).apply(event);
        self.board = self.state.project();
    }

    fn start_load(&mut self, ctx: &Context) {
        if !self.state.can_reload() {
            debug!("reload ignored, a load is already in flight");
            return;
        }
        self.dispatch(ViewEvent::LoadStarted);
        self.last_load = Some(Instant::now());

        let (tx, rx) = oneshot::channel();
        let loader = Arc::clone(&self.loader);
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = loader.load().await;
            let _ = tx.send(result);
            ctx.request_repaint();
        });
        self.pending = Some(rx);
        info!("load started");
    }

    fn poll_load(&mut self) {
        let Some(rx) = self.pending.as_mut() else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(LoadError::NetworkFailure(
                "load task ended without a result".to_string(),
            )),
        };
        self.pending = None;
        self.dispatch(ViewEvent::LoadFinished(result));
    }

    fn maybe_auto_refresh(&mut self, ctx: &Context) {
        let Some(every) = self.refresh_every else {
            return;
        };
        let due = self.last_load.map_or(true, |t| t.elapsed() >= every);
        if due && self.state.can_reload() {
            self.start_load(ctx);
        }
        let wait = self
            .last_load
            .map_or(every, |t| every.saturating_sub(t.elapsed()));
        ctx.request_repaint_after(wait);
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("CS2 Inventory Prices").color(ACCENT).strong());
        });

        ui.add_space(4.0);
        ui.separator();
        ui.add_space(4.0);

        let mut reload_clicked = false;
        ui.horizontal(|ui| {
            let reload = ui.add_enabled(
                self.state.can_reload(),
                egui::Button::new(RichText::new("⟳ Refresh").strong())
                    .min_size(Vec2::new(100.0, 28.0)),
            );
            reload_clicked = reload.clicked();
            if self.state.loading {
                ui.spinner();
            }

            ui.separator();

            ui.label(RichText::new("🔎").color(HEADER));
            let search = ui.add(
                egui::TextEdit::singleline(&mut self.query_input)
                    .hint_text("Search items...")
                    .desired_width(240.0),
            );
            if search.changed() {
                let query = self.query_input.clone();
                self.dispatch(ViewEvent::QueryChanged(query));
            }

            ui.separator();
            ui.label(
                RichText::new(format!(
                    "{} of {} items",
                    self.board.visible_count, self.board.total_count
                ))
                .color(HEADER),
            );
        });

        if reload_clicked {
            let ctx = ui.ctx().clone();
            self.start_load(&ctx);
        }

        if let Some(err) = &self.state.notice {
            ui.add_space(4.0);
            egui::Frame::new()
                .fill(Color32::from_rgb(60, 24, 24))
                .stroke(Stroke::new(1.0, LOSS))
                .inner_margin(Margin::same(8))
                .show(ui, |ui| {
                    ui.label(RichText::new(format!("⚠ {err}")).color(Color32::from_rgb(255, 200, 200)));
                });
        }

        ui.add_space(4.0);
        self.summary_strip(ui);
        ui.add_space(2.0);
    }

    fn summary_strip(&self, ui: &mut egui::Ui) {
        let s = &self.board.summary;
        ui.horizontal(|ui| {
            for (label, cell) in [
                ("Total value", &s.total_value),
                ("Total P/L", &s.total_profit_loss),
                ("Avg change", &s.average_percent_change),
                ("Last updated", &s.last_updated),
            ] {
                ui.label(RichText::new(label).color(HEADER).small());
                ui.label(cell_text(cell).strong());
                ui.separator();
            }
        });
    }

    fn table(&mut self, ui: &mut egui::Ui) {
        let mut clicked: Option<SortKey> = None;
        let active = self.state.sort;

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .vscroll(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
        for key in SortKey::ALL {
            builder = builder.column(column_width(key));
        }

        builder
            .header(28.0, |mut header| {
                for key in SortKey::ALL {
                    header.col(|ui| {
                        let arrow = match (active.key == key, active.direction) {
                            (true, SortDirection::Ascending) => " ▲",
                            (true, SortDirection::Descending) => " ▼",
                            (false, _) => "",
                        };
                        let text = RichText::new(format!("{}{}", key.label(), arrow)).strong();
                        let text = if active.key == key {
                            text.color(ACCENT)
                        } else {
                            text.color(HEADER)
                        };
                        if ui.add(egui::Button::new(text).frame(false)).clicked() {
                            clicked = Some(key);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(26.0, self.board.rows.len(), |mut row| {
                    let r = &self.board.rows[row.index()];
                    for key in SortKey::ALL {
                        row.col(|ui| {
                            ui.label(cell_text(r.cell(key)));
                        });
                    }
                });
            });

        if let Some(key) = clicked {
            self.dispatch(ViewEvent::ColumnActivated(key));
        }
    }
}

impl eframe::App for PriceBoardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_load();
        self.maybe_auto_refresh(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);
            self.top_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.board.rows.is_empty() {
                ui.centered_and_justified(|ui| {
                    let msg = if self.state.loading {
                        "Loading prices..."
                    } else if self.board.total_count == 0 {
                        "No price data loaded"
                    } else {
                        "No items match your search"
                    };
                    ui.label(RichText::new(msg).size(18.0).color(HEADER));
                });
                return;
            }
            self.table(ui);
        });
    }
}
