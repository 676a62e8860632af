//! Basic example of the Ambar container.

use ambar::Bean;
use ambar::prelude::*;

mod services {
    use super::*;

    #[derive(Clone)]
    pub struct Config {
        pub database_url: String,
        pub debug: bool,
    }

    #[derive(Default, Bean)]
    pub struct Database {
        #[inject]
        #[named(name = "config")]
        pub config: Option<Config>,
    }

    #[derive(Default, Bean)]
    #[bean(name = "userService")]
    pub struct UserService {
        #[base]
        pub database: Database,
        #[inject]
        pub greeting: Option<&'static str>,
    }

    impl UserService {
        pub fn get_user(&self, id: u64) -> String {
            let url = self
                .database
                .config
                .as_ref()
                .map_or("<unconfigured>", |config| config.database_url.as_str());
            format!("{} user {id} from {url}", self.greeting.unwrap_or("Loading"))
        }
    }

    #[derive(Default, Bean)]
    pub struct LegacyService;
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("ambar_container=debug")
        .init();

    let config: ContainerConfig = serde_json::from_str(
        r#"{ "packages": ["basic::services"], "exclude": ["LegacyService"] }"#,
    )
    .expect("valid config");

    let mut builder = Container::builder();
    builder.apply_config(&config);
    builder
        .add_injectable(
            "config",
            services::Config {
                database_url: "postgres://localhost/myapp".to_string(),
                debug: true,
            },
        )?
        .add_injectable("greeting", "Found")?;

    let container = builder.scan()?;
    println!("✅ Container scanned: {:?}", container.bean_names());

    let service = container
        .get_bean_by_type::<services::UserService>()?
        .expect("UserService is scanned");
    println!("👤 {}", service.get_user(42));

    let database = container
        .get_bean_by_type::<services::Database>()?
        .expect("Database is scanned");
    if let Some(config) = &database.config {
        println!("📋 debug={}", config.debug);
    }

    match container.get_bean_by_type::<services::LegacyService>() {
        Err(err) => println!("🚫 {err}"),
        Ok(_) => println!("LegacyService should have been excluded"),
    }

    Ok(())
}
