use sluice::{Passthrough, Pipe, PipeConfig};
use sluice_pipes::{CollectionPipe, FilterPipe};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct User {
    name: String,
    active: bool,
}

impl User {
    fn new(name: &str, active: bool) -> Self {
        Self {
            name: name.to_string(),
            active,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn config(name: &str) -> PipeConfig {
    PipeConfig::default().with_name(name)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        info!("Wiring users -> active -> view");
        let users = Pipe::new(
            CollectionPipe::with_items([User::new("ada", true)]),
            config("users"),
        );
        let active = Pipe::new(FilterPipe::new(|user: &User| user.active), config("active"));
        let view = Pipe::new(Passthrough::<User>::new(), config("view"));

        view.on("add", |user: &User| println!("view shows {user}"))
            .on("remove", |user: &User| println!("view hides {user}"));
        users.on_error(|e| eprintln!("users pipe failed: {e}"));

        users.pipe(active).pipe(view.clone());

        users.add(User::new("grace", true)).await?;
        users.add(User::new("mallory", false)).await?;
        let settled = users.add(User::new("ada", true)).await?;
        println!("re-adding ada settled with {:?}", settled.event());
        users.remove(User::new("grace", true)).await?;

        // Let chained operations settle before shutting down
        tokio::time::sleep(Duration::from_millis(100)).await;
        println!(
            "users now holds {:?}",
            users.behavior().items()?.iter().map(ToString::to_string).collect::<Vec<_>>()
        );
        Ok::<(), Box<dyn Error>>(())
    })
}
