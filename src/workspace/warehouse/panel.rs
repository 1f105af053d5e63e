//! Warehouse panel: table list, query input, CSV row upload and results.

use gpui::{prelude::FluentBuilder as _, *};
use gpui_component::{
    ActiveTheme as _, Disableable, Sizable as _, StyledExt as _, WindowExt as _,
    button::{Button, ButtonVariants as _},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    list::ListItem,
    notification::NotificationType,
    spinner::Spinner,
    v_flex,
};

use bucketdesk::services::{FileKind, SelectResult, WarehouseSession};

use crate::state::{WarehouseState, warehouse_disconnect};
use crate::workspace::results::{render_message, render_table};

pub struct WarehousePanel {
    session: Option<WarehouseSession>,
    tables: Vec<String>,
    selected_table: Option<String>,
    query_input: Entity<InputState>,
    upload_path: Entity<InputState>,
    result: Option<SelectResult>,
    is_loading_tables: bool,
    is_running: bool,
    is_uploading: bool,
    _subscriptions: Vec<Subscription>,
}

impl WarehousePanel {
    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let query_input = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("SELECT * FROM main.default.orders LIMIT 10")
                .clean_on_escape()
        });
        let upload_path = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("/path/to/rows.csv")
                .clean_on_escape()
        });

        let _subscriptions = vec![
            cx.observe_global_in::<WarehouseState>(window, move |this, window, cx| {
                let session = cx.global::<WarehouseState>().session.clone();
                if session != this.session {
                    this.session = session;
                    this.tables.clear();
                    this.selected_table = None;
                    this.result = None;
                    if this.session.is_some() {
                        this.load_tables(window, cx);
                    }
                }
                cx.notify();
            }),
            cx.subscribe_in(
                &query_input,
                window,
                |this, _, event: &InputEvent, window, cx| {
                    if let InputEvent::PressEnter { .. } = event {
                        this.run_query(window, cx);
                    }
                },
            ),
        ];

        Self {
            session: cx.global::<WarehouseState>().session.clone(),
            tables: vec![],
            selected_table: None,
            query_input,
            upload_path,
            result: None,
            is_loading_tables: false,
            is_running: false,
            is_uploading: false,
            _subscriptions,
        }
    }

    fn notify_error(message: String, window: &mut Window, cx: &mut App) {
        let error_msg: SharedString = message.into();
        window.push_notification((NotificationType::Error, error_msg), cx);
    }

    fn load_tables(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.clone() else {
            return;
        };

        self.is_loading_tables = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = session.list_tables().await;

            this.update_in(cx, |this, window, cx| {
                this.is_loading_tables = false;
                match result {
                    Ok(tables) => {
                        tracing::info!("Loaded {} tables", tables.len());
                        this.tables = tables;
                    }
                    Err(e) => {
                        tracing::error!("Failed to list tables: {}", e);
                        this.tables.clear();
                        Self::notify_error(format!("Failed to list tables: {}", e), window, cx);
                    }
                }
                cx.notify();
            })
            .ok();
        })
        .detach();
    }

    /// Show the first rows of a table.
    fn browse_table(&mut self, table: String, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.clone() else {
            return;
        };

        self.selected_table = Some(table.clone());
        self.is_running = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = session.browse_table(&table).await;
            this.update_in(cx, |this, window, cx| {
                this.apply_result(result, window, cx);
            })
            .ok();
        })
        .detach();
    }

    fn run_query(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.clone() else {
            return;
        };
        if self.is_running {
            return;
        }

        let query = self.query_input.read(cx).value().to_string();
        self.is_running = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = session.run_query(&query).await;
            this.update_in(cx, |this, window, cx| {
                this.apply_result(result, window, cx);
            })
            .ok();
        })
        .detach();
    }

    fn apply_result(
        &mut self,
        result: anyhow::Result<SelectResult>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.is_running = false;
        match result {
            Ok(result) => {
                tracing::debug!(
                    "{} rows in {} ms for: {}",
                    result.row_count,
                    result.execution_time_ms,
                    result.original_query
                );
                self.result = Some(result);
            }
            Err(e) => {
                tracing::error!("Query failed: {}", e);
                Self::notify_error(format!("Query failed: {}", e), window, cx);
            }
        }
        cx.notify();
    }

    /// Insert the rows of a local CSV file into the selected table.
    fn upload_csv(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let Some(table) = self.selected_table.clone() else {
            Self::notify_error("Select a target table first.".to_string(), window, cx);
            return;
        };

        let path = self.upload_path.read(cx).value().trim().to_string();
        if FileKind::from_name(&path) != Some(FileKind::Csv) {
            Self::notify_error("Row upload needs a .csv file.".to_string(), window, cx);
            return;
        }

        self.is_uploading = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = async {
                let content = async_fs::read(&path)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
                session.upload_csv(&table, &content).await
            }
            .await;

            this.update_in(cx, |this, window, cx| {
                this.is_uploading = false;
                match result {
                    Ok(report) => {
                        let msg: SharedString = format!(
                            "Inserted {} rows into {}",
                            report.rows_inserted, report.table
                        )
                        .into();
                        window.push_notification((NotificationType::Success, msg), cx);
                    }
                    Err(e) => {
                        tracing::error!("Row upload into {} failed: {}", table, e);
                        Self::notify_error(format!("Upload failed: {}", e), window, cx);
                    }
                }
                cx.notify();
            })
            .ok();
        })
        .detach();
    }

    fn render_toolbar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let label = self
            .session
            .as_ref()
            .map(|s| s.config().display_name())
            .unwrap_or_default();

        h_flex()
            .gap_2()
            .items_center()
            .p_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .child(Label::new(label).font_semibold().text_sm())
            .child(div().flex_1().child(Input::new(&self.query_input).small()))
            .child(
                Button::new("run-query")
                    .primary()
                    .small()
                    .child("Run")
                    .loading(self.is_running)
                    .on_click(cx.listener(|this, _, window, cx| this.run_query(window, cx))),
            )
            .child(
                Button::new("disconnect-warehouse")
                    .ghost()
                    .small()
                    .child("Disconnect")
                    .on_click(cx.listener(|_this, _, _, cx| warehouse_disconnect(cx))),
            )
    }

    fn render_table_list(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let body = if self.is_loading_tables {
            div()
                .flex()
                .flex_1()
                .items_center()
                .justify_center()
                .child(Spinner::new())
                .into_any_element()
        } else if self.tables.is_empty() {
            render_message("No tables", None, cx)
        } else {
            let items: Vec<_> = self
                .tables
                .iter()
                .enumerate()
                .map(|(ix, table)| {
                    let is_selected = self.selected_table.as_deref() == Some(table.as_str());
                    let table_clone = table.clone();
                    ListItem::new(ix)
                        .w_full()
                        .py_1()
                        .px_3()
                        .when(is_selected, |d| d.bg(cx.theme().list_active))
                        .child(Label::new(table.clone()).text_sm())
                        .on_click(cx.listener(move |this, _, window, cx| {
                            this.browse_table(table_clone.clone(), window, cx);
                        }))
                        .into_any_element()
                })
                .collect();

            div()
                .id("table-list")
                .flex_1()
                .overflow_y_scroll()
                .child(v_flex().children(items))
                .into_any_element()
        };

        v_flex()
            .w(px(260.))
            .h_full()
            .border_r_1()
            .border_color(cx.theme().border)
            .child(
                h_flex()
                    .justify_between()
                    .items_center()
                    .p_2()
                    .child(Label::new("Tables").font_semibold().text_sm())
                    .child(
                        Button::new("refresh-tables")
                            .ghost()
                            .small()
                            .child("Refresh")
                            .disabled(self.is_loading_tables)
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.load_tables(window, cx)
                            })),
                    ),
            )
            .child(body)
    }

    fn render_results(&self, cx: &mut Context<Self>) -> AnyElement {
        if self.is_running {
            return div()
                .flex()
                .flex_1()
                .items_center()
                .justify_center()
                .child(Spinner::new())
                .into_any_element();
        }

        match &self.result {
            Some(result) => v_flex()
                .size_full()
                .child(
                    div().px_2().py_1().child(
                        Label::new(format!(
                            "{} rows in {} ms",
                            result.row_count, result.execution_time_ms
                        ))
                        .text_xs()
                        .text_color(cx.theme().muted_foreground),
                    ),
                )
                .child(
                    div()
                        .flex_1()
                        .overflow_hidden()
                        .child(render_table("query-result", &result.to_table_preview(), cx)),
                )
                .into_any_element(),
            None => render_message("Select a table or run a query.", None, cx),
        }
    }

    fn render_upload_bar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let target = self
            .selected_table
            .clone()
            .unwrap_or_else(|| "no table selected".to_string());

        h_flex()
            .gap_2()
            .p_2()
            .items_center()
            .border_t_1()
            .border_color(cx.theme().border)
            .child(
                Label::new(format!("Upload rows into {}", target))
                    .text_sm()
                    .text_color(cx.theme().muted_foreground),
            )
            .child(div().flex_1().child(Input::new(&self.upload_path).small()))
            .child(
                Button::new("upload-rows")
                    .small()
                    .child("Upload CSV")
                    .loading(self.is_uploading)
                    .disabled(self.is_uploading || self.selected_table.is_none())
                    .on_click(cx.listener(|this, _, window, cx| this.upload_csv(window, cx))),
            )
    }
}

impl Render for WarehousePanel {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        v_flex()
            .flex_1()
            .h_full()
            .child(self.render_toolbar(cx))
            .child(
                h_flex()
                    .flex_1()
                    .overflow_hidden()
                    .child(self.render_table_list(cx))
                    .child(
                        v_flex()
                            .flex_1()
                            .h_full()
                            .child(div().flex_1().overflow_hidden().child(self.render_results(cx)))
                            .child(self.render_upload_bar(cx)),
                    ),
            )
    }
}
