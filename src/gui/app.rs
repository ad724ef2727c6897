//! Dolphin Dashboard Main Application
//! Single window: toolbar, loading/error states and the monthly dashboard.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::TableCache;
use crate::export;
use crate::gui::{kpi_cards, table_view, ChartViewer};
use crate::report::Dashboard;
use chrono::{Local, NaiveDate};
use egui::{Color32, RichText};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// Spreadsheet loading result from background thread
enum LoadResult {
    Complete(Arc<DataFrame>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    cache: Arc<TableCache>,
    source: String,
    chart_viewer: ChartViewer,

    // Async spreadsheet loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    table: Option<Arc<DataFrame>>,
    dashboard: Option<Dashboard>,
    load_error: Option<String>,

    status: String,
    last_csv: Option<PathBuf>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        cache: Arc<TableCache>,
    ) -> Self {
        Self::with_cache(config, cache)
    }

    fn with_cache(config: DashboardConfig, cache: Arc<TableCache>) -> Self {
        let source = cache.source_description();
        Self {
            config,
            cache,
            source,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
            table: None,
            dashboard: None,
            load_error: None,
            status: String::new(),
            last_csv: None,
        }
    }

    /// Fetch the table in a background thread so the spinner keeps drawing.
    fn start_load(&mut self, ctx: &egui::Context) {
        if self.is_loading {
            return;
        }

        self.is_loading = true;
        self.load_error = None;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let cache = Arc::clone(&self.cache);
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = match cache.get() {
                Ok(table) => LoadResult::Complete(table),
                Err(e) => {
                    error!(error = %e, "Failed to load trip table");
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(table)) => {
                self.table = Some(table);
                self.dashboard = None;
                self.is_loading = false;
            }
            Ok(LoadResult::Error(message)) => {
                self.load_error = Some(message);
                self.is_loading = false;
            }
            Err(TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(TryRecvError::Disconnected) => {
                error!("Loader thread exited without a result");
                self.load_error = Some("o carregamento foi interrompido".to_string());
                self.is_loading = false;
            }
        }
    }

    /// Rebuild the render model when the table or the date changed.
    fn refresh_dashboard(&mut self, today: NaiveDate) {
        let Some(table) = &self.table else {
            return;
        };
        if self.dashboard.as_ref().is_some_and(|d| d.today == today) {
            return;
        }

        match Dashboard::build(table, today, &self.config.export_context) {
            Ok(dashboard) => self.dashboard = Some(dashboard),
            Err(e) => {
                error!(error = %e, "Failed to build dashboard");
                self.table = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Retry after a failure. The cached table is dropped too, since it may be
    /// the one that failed to build.
    fn retry(&mut self, ctx: &egui::Context) {
        self.handle_reload(ctx);
    }

    fn handle_reload(&mut self, ctx: &egui::Context) {
        info!("Reloading trip table");
        self.cache.invalidate();
        self.table = None;
        self.dashboard = None;
        self.start_load(ctx);
    }

    fn handle_download_csv(&mut self) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(&dashboard.download.file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match export::save_csv(&dashboard.download.bytes, &path) {
            Ok(()) => {
                self.status = format!("CSV salvo em {}", path.display());
                self.last_csv = Some(path);
            }
            Err(e) => {
                error!(error = %e, "CSV export failed");
                self.status = format!("Erro: {}", e);
            }
        }
    }

    fn handle_export_charts(&mut self) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };

        let charts = dashboard.ready_charts();
        if charts.iter().all(|c| c.is_empty()) {
            self.status = "Nenhum gráfico com dados para exportar".to_string();
            return;
        }

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match StaticChartRenderer::export_all(&charts, &dir, &dashboard.month) {
            Ok(written) => {
                self.status = format!("{} gráficos exportados para {}", written.len(), dir.display())
            }
            Err(e) => {
                error!(error = %e, "Chart export failed");
                self.status = format!("Erro: {}", e);
            }
        }
    }

    fn handle_open_csv(&mut self) {
        if let Some(path) = &self.last_csv {
            if let Err(e) = open::that(path) {
                self.status = format!("Erro ao abrir {}: {}", path.display(), e);
            }
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("📊 Painel de Desempenho - Uber com BYD Dolphin")
                        .size(20.0)
                        .strong(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!self.is_loading, |ui| {
                        if ui.button("🔄 Recarregar dados").clicked() {
                            self.handle_reload(ctx);
                        }
                    });
                });
            });
        });
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };

        let mut download = false;
        let mut export_charts = false;
        let mut open_csv = false;

        egui::CollapsingHeader::new("📝 Colunas disponíveis").show(ui, |ui| {
            for column in &dashboard.columns {
                ui.label(RichText::new(format!("{:?}", column)).monospace().size(11.0));
            }
        });
        ui.add_space(10.0);

        ui.heading(format!("📅 Desempenho - {}", dashboard.month));
        ui.add_space(8.0);
        kpi_cards::show(ui, &dashboard.cards);
        ui.add_space(15.0);

        self.chart_viewer.show(ui, dashboard);
        ui.add_space(10.0);

        egui::CollapsingHeader::new("🔍 Ver dados detalhados do mês").show(ui, |ui| {
            table_view::show(ui, &dashboard.table);
        });
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            download = ui.button("⬇️ Baixar dados do mês (CSV)").clicked();
            export_charts = ui.button("🖼 Exportar gráficos (PNG)").clicked();
            if self.last_csv.is_some() {
                open_csv = ui.button("📂 Abrir CSV").clicked();
            }
        });

        if !self.status.is_empty() {
            let color = if self.status.starts_with("Erro") {
                ERROR_COLOR
            } else {
                OK_COLOR
            };
            ui.label(RichText::new(&self.status).size(11.0).color(color));
        }

        if download {
            self.handle_download_csv();
        }
        if export_charts {
            self.handle_export_charts();
        }
        if open_csv {
            self.handle_open_csv();
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.table.is_none() && !self.is_loading && self.load_error.is_none() {
            self.start_load(ctx);
        }
        self.refresh_dashboard(Local::now().date_naive());

        // Keep the spinner moving while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        self.show_toolbar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("✅ Dados carregados de {}", self.source))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                    ui.add_space(8.0);

                    if self.is_loading {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Carregando dados...");
                        });
                    } else if let Some(message) = self.load_error.clone() {
                        ui.label(
                            RichText::new(format!("Erro ao carregar os dados: {}", message))
                                .color(ERROR_COLOR),
                        );
                        if ui.button("Tentar novamente").clicked() {
                            self.retry(ctx);
                        }
                    } else {
                        self.show_dashboard(ui);
                    }

                    ui.add_space(20.0);
                    ui.separator();
                    ui.label(
                        RichText::new("Criado com ❤️ por Jefferson e assistido por Jarvis ✨")
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                });
        });
    }
}
