//! Command-line access to the translation store.
//!
//! Usage:
//!   klingon languages
//!   klingon list <entity_type> <entity_id> <lang>
//!   klingon get <entity_type> <entity_id> <lang> <field>
//!   klingon set <entity_type> <entity_id> <lang> <field> <text>
//!   klingon materialize <entity_type> <entity_id> <field>...
//!   klingon count
//!
//! Configuration comes from the environment (see `Config::from_env`).
//! Entities are described entirely by the arguments, so `get` has no
//! attribute to fall back to and prints "" for untranslated fields.

use anyhow::{bail, Context, Result};
use klingon::config::Config;
use klingon::{
    Database, MemoryCache, NullCache, Translatable, TranslatableExt, TranslationCache, Translator,
};
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "Usage: klingon <languages|list|get|set|materialize|count> [args...]";

/// Entity known only by its type tag, id, and declared fields
struct AdHocEntity<'a> {
    entity_type: &'a str,
    entity_id: i64,
    fields: Vec<&'a str>,
}

impl Translatable for AdHocEntity<'_> {
    fn entity_type(&self) -> &str {
        self.entity_type
    }

    fn entity_id(&self) -> i64 {
        self.entity_id
    }

    fn translatable_fields(&self) -> &[&str] {
        &self.fields
    }

    fn field_value(&self, _field: &str) -> Option<String> {
        None
    }
}

fn parse_entity<'a>(args: &'a [String], fields: Vec<&'a str>) -> Result<AdHocEntity<'a>> {
    let (Some(entity_type), Some(entity_id)) = (args.first(), args.get(1)) else {
        bail!("{}", USAGE);
    };
    let entity_id: i64 = entity_id
        .parse()
        .context(format!("Invalid entity id: {}", entity_id))?;
    if entity_id < 0 {
        bail!("Entity id must be non-negative, got {}", entity_id);
    }

    Ok(AdHocEntity {
        entity_type: entity_type.as_str(),
        entity_id,
        fields,
    })
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .with_context(|| format!("Missing <{}>\n{}", name, USAGE))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("klingon=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{}", USAGE);
    };
    let rest = &args[1..];

    let config = Config::from_env()?;

    if command == "languages" {
        for lang in config.languages.list_all() {
            println!("{}\t{}", lang.code, lang.name);
        }
        return Ok(());
    }

    let db = Arc::new(Database::new(&config.database_url, config.database_max_connections).await?);
    let cache: Arc<dyn TranslationCache> = match (config.cache_enabled, config.cache_ttl) {
        (false, _) => Arc::new(NullCache),
        (true, Some(ttl)) => Arc::new(MemoryCache::with_ttl(ttl)),
        (true, None) => Arc::new(MemoryCache::new()),
    };
    let translator = Translator::new(db.clone(), cache, config.languages.clone())
        .with_policy(config.policy);

    match command.as_str() {
        "list" => {
            let entity = parse_entity(rest, Vec::new())?;
            let language = arg(rest, 2, "lang")?;
            let records = entity.translations(&translator).list_translations(language).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        "get" => {
            let language = arg(rest, 2, "lang")?;
            let field = arg(rest, 3, "field")?;
            let entity = parse_entity(rest, vec![field])?;
            let text = entity.translations(&translator).get_translation(language, field).await?;
            println!("{}", text);
        }
        "set" => {
            let language = arg(rest, 2, "lang")?;
            let field = arg(rest, 3, "field")?;
            let text = arg(rest, 4, "text")?;
            let entity = parse_entity(rest, vec![field])?;
            let record = entity
                .translations(&translator)
                .set_translation(language, field, text)
                .await?;
            info!("Saved translation {}", record.key());
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        "materialize" => {
            let fields: Vec<&str> = rest.iter().skip(2).map(String::as_str).collect();
            if fields.is_empty() {
                bail!("Missing <field>...\n{}", USAGE);
            }
            let entity = parse_entity(rest, fields)?;
            let records = entity.translations(&translator).materialize_all().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        "count" => {
            println!("{}", db.count().await?);
        }
        other => bail!("Unknown command: {}\n{}", other, USAGE),
    }

    Ok(())
}
