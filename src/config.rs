use clap::ValueEnum;

/// Which of the four apps this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AppKind {
    Landing,
    Calculator,
    Quiz,
    Todo,
}

impl AppKind {
    pub fn name(&self) -> &'static str {
        match self {
            AppKind::Landing => "landing",
            AppKind::Calculator => "calculator",
            AppKind::Quiz => "quiz",
            AppKind::Todo => "todo",
        }
    }

    fn default_database_url(&self) -> &'static str {
        match self {
            AppKind::Landing => "sqlite:website.db?mode=rwc",
            AppKind::Calculator => "sqlite:calculator.db?mode=rwc",
            AppKind::Quiz => "sqlite:codequiz.db?mode=rwc",
            AppKind::Todo => "sqlite:todoist.db?mode=rwc",
        }
    }
}

/// Per-process configuration, resolved once in `main` and carried in
/// `AppState`. Flags win over environment, environment over defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppKind,
    pub bind_addr: String,
    pub database_url: String,
}

impl Config {
    pub fn load(app: AppKind, port: Option<u16>, database_url: Option<String>) -> Config {
        let port = port
            .or_else(|| dotenv::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(5000);

        let database_url = database_url
            .or_else(|| dotenv::var("DATABASE_URL").ok())
            .unwrap_or_else(|| app.default_database_url().to_owned());

        Config {
            app,
            bind_addr: format!("0.0.0.0:{port}"),
            database_url,
        }
    }
}
