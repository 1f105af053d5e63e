mod state;
mod workspace;

use gpui::*;
use gpui_component::Root;
use tracing_subscriber::EnvFilter;

use crate::workspace::Workspace;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bucketdesk=info")),
        )
        .init();

    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        state::init(cx);

        cx.activate(true);

        let bounds = Bounds::centered(None, size(px(1280.), px(800.)), cx);
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some("bucketdesk".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        cx.spawn(async move |cx| {
            cx.open_window(options, |window, cx| {
                let view: AnyView = Workspace::view(window, cx).into();
                cx.new(|cx| Root::new(view, window, cx))
            })?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });
}
