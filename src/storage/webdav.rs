use super::ObjectTableStore;
use crate::model::StoreConfig;
use anyhow::Result;
use opendal::Operator;

impl ObjectTableStore {
    pub async fn webdav(
        endpoint: &str,
        username: &str,
        password: &str,
        config: &StoreConfig,
    ) -> Result<Self> {
        use opendal::services::Webdav;

        let mut builder = Webdav::default()
            .endpoint(endpoint)
            .username(username)
            .password(password);

        if let Some(ref r) = config.root {
            builder = builder.root(r);
        }

        let operator = Self::layered(Operator::new(builder)?.finish(), config);

        let name = format!(
            "webdav://{}{}",
            endpoint.trim_end_matches('/'),
            config
                .root
                .as_deref()
                .map(|r| format!("/{}", r.trim_start_matches('/')))
                .unwrap_or_default()
        );

        // Some servers need the root collection before the first PUT.
        // Errors are ignored here and surface on the first table call
        let _ = operator.create_dir("/").await;

        Ok(Self::new(operator, name))
    }
}
