use gemini_chat::secret_store::{SecretStore, API_KEY_ENTRY};

pub fn set_key(key: &str) -> anyhow::Result<()> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("refusing to store an empty API key");
    }
    let mut store = SecretStore::new()?;
    store.set(API_KEY_ENTRY, key)?;
    println!("API key saved.");
    Ok(())
}
