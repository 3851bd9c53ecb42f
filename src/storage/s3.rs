use super::ObjectTableStore;
use crate::model::StoreConfig;
use anyhow::Result;
use opendal::Operator;

impl ObjectTableStore {
    pub fn s3(
        bucket: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        config: &StoreConfig,
    ) -> Result<Self> {
        use opendal::services::S3;

        let mut builder = S3::default()
            .bucket(bucket)
            .region(region)
            .access_key_id(access_key)
            .secret_access_key(secret_key);

        if let Some(ref ep) = config.endpoint {
            if !ep.is_empty() {
                builder = builder.endpoint(ep);
            }
        }

        if let Some(ref p) = config.prefix {
            builder = builder.root(p);
        }

        let operator = Self::layered(Operator::new(builder)?.finish(), config);

        let name = format!(
            "s3://{}{}",
            bucket,
            config
                .prefix
                .as_deref()
                .map(|p| format!("/{}", p.trim_start_matches('/')))
                .unwrap_or_default()
        );

        Ok(Self::new(operator, name))
    }
}
