use hyper::StatusCode;
use servkit::{App, Config};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::load()?;
    servkit::logger::init(&config.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(run(config))
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut app = App::new(config);

    app.get("/", |_ctx, res| async move {
        res.send_text("servkit is running\n", "text/plain", StatusCode::OK)
    });

    app.get("/version", |_ctx, res| async move {
        #[derive(serde::Serialize)]
        struct Version {
            name: &'static str,
            version: &'static str,
        }
        res.send_serialized(
            &Version {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            StatusCode::OK,
        )
    });

    // Media delivery with byte-range support (resumable downloads, seeking)
    app.get("/media/:name", |ctx, res| async move {
        let path = Path::new("media").join(ctx.param("name").unwrap_or_default());
        match ctx.range() {
            Some(range) => res.send_file_range(&path, &range, None).await,
            None => res.send_file(&path, None, StatusCode::OK).await,
        }
    });

    app.get("/download/:name", |ctx, res| async move {
        let path = Path::new("media").join(ctx.param("name").unwrap_or_default());
        res.download(&path, None, None, StatusCode::OK).await
    });

    app.get("/pages/:page", |ctx, res| async move {
        let path = Path::new("pages").join(format!("{}.html", ctx.param("page").unwrap_or_default()));
        let mut params = res.render_params();
        params.add("title", "servkit");
        res.render_page(&path, &params, StatusCode::OK)
    });

    app.post("/echo", |ctx, res| async move {
        let body = ctx.read_body().await?;
        res.send_bytes(body, None, None, StatusCode::OK)
    });

    app.get("/old-home", |_ctx, res| async move { res.redirect("/") });

    app.run().await
}
