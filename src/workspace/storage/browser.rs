//! Storage file browser component.
//!
//! Lists the objects under a folder prefix, previews the selected object and
//! handles download and upload.

use std::path::PathBuf;

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

use bucketdesk::services::{
    ObjectInfo, Preview, StorageSession, preview,
    storage::{LocalFile, save_download},
};

use crate::state::{Settings, StorageState, set_storage_prefix, storage_disconnect};
use crate::workspace::results::{render_message, render_preview, truncate};

const EMPTY_LISTING: &str = "No files found in the specified folder.";

/// File browser for the configured bucket.
pub struct StorageBrowser {
    prefix_input: Entity<InputState>,
    upload_path: Entity<InputState>,
    session: Option<StorageSession>,
    objects: Vec<ObjectInfo>,
    selected_object: Option<ObjectInfo>,
    /// Name of the previewed file and its rendering.
    preview: Option<(String, Preview)>,
    has_listed: bool,
    is_loading: bool,
    is_previewing: bool,
    is_downloading: bool,
    is_uploading: bool,
    _subscriptions: Vec<Subscription>,
}

impl StorageBrowser {
    pub fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| Self::new(window, cx))
    }

    fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let prefix_input = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("Folder prefix, e.g. reports/2024/")
                .clean_on_escape()
        });
        let upload_path = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder("/path/to/local/file.csv")
                .clean_on_escape()
        });

        let _subscriptions = vec![
            cx.observe_global_in::<StorageState>(window, move |this, window, cx| {
                let session = cx.global::<StorageState>().session.clone();
                if session != this.session {
                    this.session = session;
                    this.reset();
                    if this.session.is_some() {
                        this.load_objects(window, cx);
                    }
                }
                cx.notify();
            }),
            cx.subscribe_in(
                &prefix_input,
                window,
                |this, _, event: &InputEvent, window, cx| {
                    if let InputEvent::PressEnter { .. } = event {
                        this.load_objects(window, cx);
                    }
                },
            ),
        ];

        Self {
            prefix_input,
            upload_path,
            session: cx.global::<StorageState>().session.clone(),
            objects: vec![],
            selected_object: None,
            preview: None,
            has_listed: false,
            is_loading: false,
            is_previewing: false,
            is_downloading: false,
            is_uploading: false,
            _subscriptions,
        }
    }

    fn reset(&mut self) {
        self.objects.clear();
        self.selected_object = None;
        self.preview = None;
        self.has_listed = false;
    }

    fn current_prefix(&self, cx: &App) -> String {
        self.prefix_input.read(cx).value().trim().to_string()
    }

    /// List the objects under the prefix in the input.
    fn load_objects(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.clone() else {
            return;
        };

        let prefix = self.current_prefix(cx);
        set_storage_prefix(prefix.clone(), cx);

        self.is_loading = true;
        self.selected_object = None;
        self.is_previewing = false;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = session.list(&prefix).await;

            this.update_in(cx, |this, window, cx| {
                this.is_loading = false;
                this.has_listed = true;

                match result {
                    Ok(objects) => {
                        tracing::debug!("{} objects under '{}'", objects.len(), prefix);
                        this.objects = objects;
                    }
                    Err(e) => {
                        tracing::error!("Failed to list '{}': {}", prefix, e);
                        this.objects.clear();
                        let error_msg: SharedString = format!("Failed to list files: {}", e).into();
                        window.push_notification((NotificationType::Error, error_msg), cx);
                    }
                }

                cx.notify();
            })
            .ok();
        })
        .detach();
    }

    /// Select an object and load its preview.
    fn select_object(&mut self, object: ObjectInfo, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.clone() else {
            return;
        };

        self.selected_object = Some(object.clone());
        self.is_previewing = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = session.preview(&object.key).await;

            this.update_in(cx, |this, window, cx| {
                // A newer selection wins and keeps its spinner
                if !is_current_selection(this.selected_object.as_ref(), &object.key) {
                    return;
                }
                this.is_previewing = false;

                match result {
                    Ok(preview) => this.preview = Some((object.name.clone(), preview)),
                    Err(e) => {
                        tracing::error!("Failed to fetch {}: {}", object.key, e);
                        this.preview = None;
                        let error_msg: SharedString =
                            format!("Failed to fetch {}: {}", object.name, e).into();
                        window.push_notification((NotificationType::Error, error_msg), cx);
                    }
                }

                cx.notify();
            })
            .ok();
        })
        .detach();
    }

    /// Download the selected object into the download directory.
    fn download_selected(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let (Some(session), Some(object)) = (self.session.clone(), self.selected_object.clone())
        else {
            return;
        };

        let Some(dir) = cx.global::<Settings>().config.download_dir.clone() else {
            window.push_notification(
                (
                    NotificationType::Error,
                    "No download directory. Set BUCKETDESK_DOWNLOAD_DIR.",
                ),
                cx,
            );
            return;
        };

        self.is_downloading = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = match session.download(&object.key).await {
                Ok(download) => save_download(&download, &dir).await,
                Err(e) => Err(e),
            };

            this.update_in(cx, |this, window, cx| {
                this.is_downloading = false;

                match result {
                    Ok(path) => {
                        let msg: SharedString = format!("Saved to {}", path.display()).into();
                        window.push_notification((NotificationType::Success, msg), cx);
                    }
                    Err(e) => {
                        tracing::error!("Failed to download {}: {}", object.key, e);
                        let error_msg: SharedString = format!("Download failed: {}", e).into();
                        window.push_notification((NotificationType::Error, error_msg), cx);
                    }
                }

                cx.notify();
            })
            .ok();
        })
        .detach();
    }

    /// Upload the local file in the path input under the current prefix.
    fn upload_file(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(session) = self.session.clone() else {
            return;
        };

        let path = self.upload_path.read(cx).value().trim().to_string();
        if path.is_empty() {
            window.push_notification((NotificationType::Error, "Enter a file path to upload."), cx);
            return;
        }

        let prefix = self.current_prefix(cx);
        self.is_uploading = true;
        cx.notify();

        cx.spawn_in(window, async move |this, cx| {
            let result = async {
                let file = LocalFile::from_path(&PathBuf::from(&path)).await?;
                let key = session.upload(&prefix, &file).await?;
                Ok::<_, anyhow::Error>((file, key))
            }
            .await;

            this.update_in(cx, |this, window, cx| {
                this.is_uploading = false;

                match result {
                    Ok((file, key)) => {
                        // Show what was uploaded
                        this.selected_object = None;
                        this.preview =
                            Some((file.name.clone(), preview::preview(&file.content, &file.name)));

                        let msg: SharedString = format!("Uploaded {}", key).into();
                        window.push_notification((NotificationType::Success, msg), cx);
                        this.upload_path
                            .update(cx, |input, cx| input.set_value("", window, cx));
                        this.load_objects(window, cx);
                    }
                    Err(e) => {
                        tracing::error!("Failed to upload {}: {}", path, e);
                        let error_msg: SharedString = format!("Upload failed: {}", e).into();
                        window.push_notification((NotificationType::Error, error_msg), cx);
                    }
                }

                cx.notify();
            })
            .ok();
        })
        .detach();
    }

    fn render_toolbar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let bucket = self
            .session
            .as_ref()
            .map(|s| s.config().bucket.clone())
            .unwrap_or_default();

        h_flex()
            .gap_2()
            .items_center()
            .p_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .child(Label::new(format!("s3://{}/", bucket)).font_semibold().text_sm())
            .child(div().flex_1().child(Input::new(&self.prefix_input).small()))
            .child(
                Button::new("list-files")
                    .primary()
                    .small()
                    .child("List")
                    .loading(self.is_loading)
                    .on_click(cx.listener(|this, _, window, cx| this.load_objects(window, cx))),
            )
            .child(
                Button::new("disconnect")
                    .ghost()
                    .small()
                    .child("Disconnect")
                    .on_click(cx.listener(|_this, _, _, cx| storage_disconnect(cx))),
            )
    }

    fn render_object_item(
        &self,
        ix: usize,
        object: &ObjectInfo,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let is_selected = self
            .selected_object
            .as_ref()
            .is_some_and(|s| s.key == object.key);

        let text_color = if is_selected {
            cx.theme().accent_foreground
        } else {
            cx.theme().foreground
        };

        let bg_color = if is_selected {
            cx.theme().list_active
        } else if ix % 2 == 0 {
            cx.theme().list
        } else {
            cx.theme().list_even
        };

        let object_clone = object.clone();

        ListItem::new(ix)
            .w_full()
            .py_2()
            .px_3()
            .bg(bg_color)
            .rounded(cx.theme().radius)
            .child(
                h_flex()
                    .justify_between()
                    .items_center()
                    .gap_2()
                    .text_color(text_color)
                    .child(
                        Label::new(truncate(&object.name, 40))
                            .font_medium()
                            .text_sm()
                            .whitespace_nowrap(),
                    )
                    .child(
                        Label::new(object.size_display())
                            .text_xs()
                            .text_color(text_color.opacity(0.6)),
                    ),
            )
            .on_click(cx.listener(move |this, _, window, cx| {
                this.select_object(object_clone.clone(), window, cx);
            }))
    }

    fn render_object_list(&self, cx: &mut Context<Self>) -> AnyElement {
        if self.is_loading {
            return div()
                .flex()
                .flex_1()
                .items_center()
                .justify_center()
                .child(Spinner::new())
                .into_any_element();
        }

        if self.objects.is_empty() {
            let message = if self.has_listed {
                EMPTY_LISTING
            } else {
                "Enter a folder prefix and press List."
            };
            return render_message(message, None, cx);
        }

        let items: Vec<_> = self
            .objects
            .iter()
            .enumerate()
            .map(|(ix, obj)| self.render_object_item(ix, obj, cx).into_any_element())
            .collect();

        div()
            .id("object-list")
            .flex_1()
            .overflow_y_scroll()
            .p_2()
            .child(v_flex().gap_1().children(items))
            .into_any_element()
    }

    fn render_preview_panel(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let title = self
            .preview
            .as_ref()
            .map(|(name, _)| name.clone())
            .or_else(|| self.selected_object.as_ref().map(|o| o.name.clone()))
            .unwrap_or_else(|| "Select a file to preview".to_string());

        let body = if self.is_previewing {
            div()
                .flex()
                .flex_1()
                .items_center()
                .justify_center()
                .child(Spinner::new())
                .into_any_element()
        } else if let Some((_, preview)) = &self.preview {
            render_preview(preview, cx)
        } else {
            div().flex_1().into_any_element()
        };

        v_flex()
            .flex_1()
            .h_full()
            .border_l_1()
            .border_color(cx.theme().border)
            .child(
                h_flex()
                    .justify_between()
                    .items_center()
                    .p_2()
                    .border_b_1()
                    .border_color(cx.theme().border)
                    .child(Label::new(title).font_semibold().text_sm())
                    .when_some(self.selected_object.as_ref(), |d, _| {
                        d.child(
                            Button::new("download")
                                .small()
                                .child("Download")
                                .loading(self.is_downloading)
                                .on_click(cx.listener(|this, _, window, cx| {
                                    this.download_selected(window, cx)
                                })),
                        )
                    }),
            )
            .child(div().flex_1().overflow_hidden().child(body))
            .child(
                h_flex()
                    .gap_2()
                    .p_2()
                    .border_t_1()
                    .border_color(cx.theme().border)
                    .child(div().flex_1().child(Input::new(&self.upload_path).small()))
                    .child(
                        Button::new("upload")
                            .small()
                            .child("Upload")
                            .loading(self.is_uploading)
                            .disabled(self.is_uploading)
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.upload_file(window, cx)
                            })),
                    ),
            )
    }
}

impl Render for StorageBrowser {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        v_flex()
            .flex_1()
            .h_full()
            .child(self.render_toolbar(cx))
            .child(
                h_flex()
                    .flex_1()
                    .overflow_hidden()
                    .child(
                        v_flex()
                            .w(px(380.))
                            .h_full()
                            .overflow_hidden()
                            .child(self.render_object_list(cx)),
                    )
                    .child(self.render_preview_panel(cx)),
            )
    }
}

/// Whether a finished preview for `key` still belongs to the selection.
fn is_current_selection(selected: Option<&ObjectInfo>, key: &str) -> bool {
    selected.is_some_and(|s| s.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::v1::test;

    #[test]
    fn test_stale_preview_is_not_current() {
        let newer = ObjectInfo::new("reports/q2.csv", 10);
        assert!(!is_current_selection(Some(&newer), "reports/q1.csv"));
        assert!(!is_current_selection(None, "reports/q1.csv"));
        assert!(is_current_selection(Some(&newer), "reports/q2.csv"));
    }
}
