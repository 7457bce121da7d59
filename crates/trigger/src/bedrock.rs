//! Amazon Bedrock Agent implementation of [`IngestionService`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_bedrockagent::Client;
use tracing::{debug, info};

use autoingest_core::config::AwsConfig;

use crate::error::IngestionError;
use crate::service::{
    IngestionJob, IngestionJobStatus, IngestionJobSummary, IngestionService, IngestionTarget,
};

/// Bedrock-backed knowledge-base ingestion client.
pub struct BedrockIngestionService {
    client: Client,
}

impl BedrockIngestionService {
    /// Create a new client from project config.
    ///
    /// Credentials come from the default provider chain unless static keys
    /// are configured.
    pub async fn new(aws: &AwsConfig) -> Self {
        let region = aws_sdk_bedrockagent::config::Region::new(aws.region.clone());
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);

        if let (Some(key_id), Some(secret)) = (&aws.access_key_id, &aws.secret_access_key) {
            let creds = Credentials::new(
                key_id,
                secret,
                aws.session_token.clone(),
                None,
                "autoingest-static",
            );
            loader = loader.credentials_provider(creds);
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_bedrockagent::config::Builder::from(&sdk_config);

        if let Some(ref endpoint) = aws.endpoint_url {
            let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                endpoint.clone()
            } else {
                format!("https://{endpoint}")
            };
            builder = builder.endpoint_url(url);
        }

        info!(region = %aws.region, "Bedrock ingestion client initialized");

        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    /// Wrap an already-configured SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IngestionService for BedrockIngestionService {
    async fn list_ingestion_jobs(
        &self,
        target: &IngestionTarget,
        max_results: i32,
    ) -> Result<Vec<IngestionJobSummary>, IngestionError> {
        debug!(%target, max_results, "Listing ingestion jobs");

        let resp = self
            .client
            .list_ingestion_jobs()
            .knowledge_base_id(&target.knowledge_base_id)
            .data_source_id(&target.data_source_id)
            .max_results(max_results)
            .send()
            .await
            .map_err(|e| IngestionError::Provider(format!("ListIngestionJobs failed: {e:?}")))?;

        let jobs = resp
            .ingestion_job_summaries()
            .iter()
            .map(|s| IngestionJobSummary {
                job_id: s.ingestion_job_id().to_string(),
                status: IngestionJobStatus::from_wire(s.status().as_str()),
            })
            .collect::<Vec<_>>();

        debug!(count = jobs.len(), "Received ingestion job summaries");
        Ok(jobs)
    }

    async fn start_ingestion_job(
        &self,
        target: &IngestionTarget,
        description: &str,
    ) -> Result<IngestionJob, IngestionError> {
        debug!(%target, description, "Starting ingestion job");

        let resp = self
            .client
            .start_ingestion_job()
            .knowledge_base_id(&target.knowledge_base_id)
            .data_source_id(&target.data_source_id)
            .description(description)
            .send()
            .await
            .map_err(|e| IngestionError::Provider(format!("StartIngestionJob failed: {e:?}")))?;

        let job = resp
            .ingestion_job()
            .ok_or_else(|| IngestionError::MissingField("ingestionJob".into()))?;

        Ok(IngestionJob {
            job_id: job.ingestion_job_id().to_string(),
            status: IngestionJobStatus::from_wire(job.status().as_str()),
        })
    }
}
