//! Databricks SQL warehouse connection form.

use gpui::*;
use gpui_component::{
    button::{Button, ButtonVariants as _},
    form::{field, v_form},
    input::{Input, InputState},
    notification::NotificationType,
    *,
};

use bucketdesk::services::WarehouseConfig;

use crate::state::{Settings, test_warehouse_connection, warehouse_connect};

pub struct WarehouseConnectionForm {
    hostname: Entity<InputState>,
    http_path: Entity<InputState>,
    access_token: Entity<InputState>,
    catalog: Entity<InputState>,
    schema: Entity<InputState>,
    is_testing: bool,
}

impl WarehouseConnectionForm {
    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let settings = cx.global::<Settings>().config.clone();

        let hostname = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("dbc-a1b2c3d4-e5f6.cloud.databricks.com")
                .clean_on_escape()
        });
        let http_path = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("/sql/1.0/warehouses/abc123")
                .clean_on_escape()
        });
        let access_token = cx.new(|cx| {
            InputState::new(window, cx)
                .masked(true)
                .placeholder("Personal access token")
                .clean_on_escape()
        });
        let catalog = cx.new(|cx| {
            let mut i = InputState::new(window, cx).placeholder("main");
            i.set_value(settings.default_catalog.clone(), window, cx);
            i
        });
        let schema = cx.new(|cx| {
            let mut i = InputState::new(window, cx).placeholder("default");
            i.set_value(settings.default_schema.clone(), window, cx);
            i
        });

        Self {
            hostname,
            http_path,
            access_token,
            catalog,
            schema,
            is_testing: false,
        }
    }

    fn get_config(&self, window: &mut Window, cx: &mut Context<Self>) -> Option<WarehouseConfig> {
        let config = WarehouseConfig::new(
            self.hostname.read(cx).value().trim(),
            self.http_path.read(cx).value().trim(),
            self.access_token.read(cx).value().trim(),
        )
        .with_scope(
            self.catalog.read(cx).value().trim(),
            self.schema.read(cx).value().trim(),
        );

        match config.validate() {
            Ok(()) => Some(config),
            Err(message) => {
                let message: SharedString = message.into();
                window.push_notification((NotificationType::Error, message), cx);
                None
            }
        }
    }

    fn connect(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(config) = self.get_config(window, cx) {
            if let Err(e) = warehouse_connect(config, cx) {
                let error_msg: SharedString = e.to_string().into();
                window.push_notification((NotificationType::Error, error_msg), cx);
            }
        }
    }

    fn test_connection(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.is_testing {
            return;
        }

        if let Some(config) = self.get_config(window, cx) {
            self.is_testing = true;
            cx.notify();

            cx.spawn_in(window, async move |this, cx| {
                let result = test_warehouse_connection(config).await;

                this.update_in(cx, |form, window, cx| {
                    form.is_testing = false;
                    match result {
                        Ok(_) => {
                            window.push_notification(
                                (NotificationType::Success, "Connection successful!"),
                                cx,
                            );
                        }
                        Err(e) => {
                            let error_msg: SharedString =
                                format!("Connection failed: {}", e).into();
                            tracing::error!("{}", error_msg);
                            window.push_notification((NotificationType::Error, error_msg), cx);
                        }
                    }
                    cx.notify();
                })
                .ok();
            })
            .detach();
        }
    }
}

impl Render for WarehouseConnectionForm {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .p_4()
            .max_w(px(640.))
            .child(div().text_3xl().mb_4().child("Warehouse Connection"))
            .child(
                v_form()
                    .columns(2)
                    .small()
                    .child(
                        field()
                            .col_span(2)
                            .label("Server Hostname")
                            .required(true)
                            .child(Input::new(&self.hostname)),
                    )
                    .child(
                        field()
                            .col_span(2)
                            .label("HTTP Path")
                            .required(true)
                            .description("Found under the warehouse's connection details")
                            .child(Input::new(&self.http_path)),
                    )
                    .child(
                        field()
                            .col_span(2)
                            .label("Access Token")
                            .required(true)
                            .child(Input::new(&self.access_token)),
                    )
                    .child(
                        field()
                            .label("Catalog")
                            .required(true)
                            .child(Input::new(&self.catalog)),
                    )
                    .child(
                        field()
                            .label("Schema")
                            .required(true)
                            .child(Input::new(&self.schema)),
                    ),
            )
            .child(
                h_flex()
                    .mt_4()
                    .gap_2()
                    .child(
                        Button::new("test-warehouse")
                            .child("Test Connection")
                            .loading(self.is_testing)
                            .on_click(cx.listener(|this, _, win, cx| {
                                this.test_connection(win, cx)
                            })),
                    )
                    .child(
                        Button::new("connect-warehouse")
                            .primary()
                            .child("Connect")
                            .on_click(cx.listener(|this, _, win, cx| this.connect(win, cx))),
                    ),
            )
            .text_sm()
    }
}
