use super::storage::{StorageBrowser, StorageConnectionForm};
use super::warehouse::{WarehouseConnectionForm, WarehousePanel};

use crate::state::{
    StorageConnectionStatus, StorageState, WarehouseConnectionStatus, WarehouseState,
};
use gpui::*;

use gpui_component::ActiveTheme;
use gpui_component::Root;
use gpui_component::button::{Button, ButtonVariants as _};
use gpui_component::{Selectable as _, Sizable as _, h_flex};

/// Current workspace mode.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceMode {
    /// Object storage browser.
    Storage,
    /// SQL warehouse tables and queries.
    Warehouse,
}

pub struct Workspace {
    mode: WorkspaceMode,
    storage_state: StorageConnectionStatus,
    warehouse_state: WarehouseConnectionStatus,

    storage_form: Entity<StorageConnectionForm>,
    storage_browser: Entity<StorageBrowser>,
    warehouse_form: Entity<WarehouseConnectionForm>,
    warehouse_panel: Entity<WarehousePanel>,

    _subscriptions: Vec<Subscription>,
}

impl Workspace {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let storage_form = StorageConnectionForm::view(window, cx);
        let storage_browser = StorageBrowser::view(window, cx);
        let warehouse_form = WarehouseConnectionForm::view(window, cx);
        let warehouse_panel = WarehousePanel::view(window, cx);

        let _subscriptions = vec![
            cx.observe_global::<StorageState>(move |this, cx| {
                this.storage_state = cx.global::<StorageState>().connection_status;
                cx.notify();
            }),
            cx.observe_global::<WarehouseState>(move |this, cx| {
                this.warehouse_state = cx.global::<WarehouseState>().connection_status;
                cx.notify();
            }),
        ];

        Self {
            mode: WorkspaceMode::Storage,
            storage_state: cx.global::<StorageState>().connection_status,
            warehouse_state: cx.global::<WarehouseState>().connection_status,
            storage_form,
            storage_browser,
            warehouse_form,
            warehouse_panel,
            _subscriptions,
        }
    }

    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    /// Render the mode tabs for switching between Storage and Warehouse.
    fn render_mode_tabs(&self, cx: &mut Context<Self>) -> impl IntoElement {
        h_flex()
            .gap_1()
            .p_1()
            .bg(cx.theme().title_bar)
            .border_b_1()
            .border_color(cx.theme().border)
            .child(
                Button::new("mode-storage")
                    .child("Storage")
                    .small()
                    .ghost()
                    .selected(self.mode == WorkspaceMode::Storage)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.mode = WorkspaceMode::Storage;
                        cx.notify();
                    })),
            )
            .child(
                Button::new("mode-warehouse")
                    .child("Warehouse")
                    .small()
                    .ghost()
                    .selected(self.mode == WorkspaceMode::Warehouse)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.mode = WorkspaceMode::Warehouse;
                        cx.notify();
                    })),
            )
    }

    fn render_content(&mut self, cx: &mut Context<Self>) -> Stateful<Div> {
        let (id, content): (&'static str, AnyView) = match self.mode {
            WorkspaceMode::Storage => match self.storage_state {
                StorageConnectionStatus::Disconnected => {
                    ("storage-form", self.storage_form.clone().into())
                }
                StorageConnectionStatus::Connected => {
                    ("storage-browser", self.storage_browser.clone().into())
                }
            },
            WorkspaceMode::Warehouse => match self.warehouse_state {
                WarehouseConnectionStatus::Disconnected => {
                    ("warehouse-form", self.warehouse_form.clone().into())
                }
                WarehouseConnectionStatus::Connected => {
                    ("warehouse-panel", self.warehouse_panel.clone().into())
                }
            },
        };

        div()
            .id(id)
            .flex()
            .flex_1()
            .overflow_hidden()
            .bg(cx.theme().background)
            .child(content)
    }
}

impl Render for Workspace {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let content = self.render_content(cx);

        div()
            .flex()
            .flex_col()
            .size_full()
            .child(self.render_mode_tabs(cx))
            .child(content)
            .children(Root::render_notification_layer(window, cx))
    }
}
