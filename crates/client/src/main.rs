use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use finprod_client::shell::{self, Flow};
use finprod_client::{App, ClientConfig, render};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    finprod_observability::init();

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let mut app = App::new(&config);

    // Notifications appear and expire on their own; print each change.
    let mut notifications = app.notifications().subscribe();
    let printer = tokio::spawn(async move {
        while let Some(snapshot) = notifications.recv().await {
            if !snapshot.is_empty() {
                print!("{}", render::render_notifications(&snapshot));
            }
        }
    });

    app.open("/").await;
    println!("{}", shell::screen(&app));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match shell::run_line(&mut app, &line).await {
            Ok(Flow::Continue(output)) => print!("{output}"),
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("{e}"),
        }
    }

    if let Some(view) = app.active() {
        view.teardown();
    }
    printer.abort();
    Ok(())
}
