use anyhow::{anyhow, Context, Result};
use url::Url;
use vta_client::{login, ResilientClient, SessionStore};

use crate::display;

pub async fn handle(url: Option<String>, password: Option<String>) -> Result<()> {
  let login_url =
    url.ok_or_else(|| anyhow!("No login URL configured. Pass --url or set VTA_LOGIN_URL."))?;
  let login_url =
    Url::parse(&login_url).with_context(|| format!("Invalid login URL: {login_url}"))?;

  let password = match password {
    Some(password) => password,
    None => rpassword::prompt_password("Course password: ")?,
  };

  let store = SessionStore::new()?;
  let mut session = store.load_or_create()?;

  let http = ResilientClient::http();
  let endpoints = login(&http, &login_url, &password).await?;

  session.endpoints = Some(endpoints);
  store.save(&session)?;

  display::success("Logged in. The assistant endpoints are stored in your session.");
  Ok(())
}
