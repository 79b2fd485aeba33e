use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceContext;
use crate::dto::{ClientDto, CreateClientRequest, UpdateClientRequest};
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::Client;
use crate::repositories::{finish, UnitOfWork};

#[derive(Debug, Clone)]
pub struct ClientService {
    ctx: ServiceContext,
}

impl ClientService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateClientRequest) -> Result<ClientDto, ServiceError> {
        let client = Client::create(&request.name, &request.contact_email, self.ctx.now())?;

        let uow = self.ctx.store.begin().await?;
        let result = uow.clients().insert(&client).await;
        finish(uow, result).await?;

        info!(client_id = %client.id, "client created");
        Ok(client.into())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ClientDto>, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = uow.clients().list_all().await;
        let clients = finish(uow, result).await?;
        Ok(clients.into_iter().map(ClientDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, client_id: Uuid) -> Result<ClientDto, ServiceError> {
        let uow = self.ctx.store.begin().await?;
        let result = load(uow.as_ref(), client_id).await;
        Ok(finish(uow, result).await?.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        client_id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<ClientDto, ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result: Result<_, ServiceError> = async {
            let mut client = load(uow.as_ref(), client_id).await?;
            client.update(&request.name, &request.contact_email, now)?;
            uow.clients().update(&client).await?;
            Ok(client)
        }
        .await;
        Ok(finish(uow, result).await?.into())
    }

    /// Marks the client inactive. Deactivating twice is a no-op.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, client_id: Uuid) -> Result<(), ServiceError> {
        let now = self.ctx.now();
        let uow = self.ctx.store.begin().await?;
        let result: Result<_, ServiceError> = async {
            let mut client = load(uow.as_ref(), client_id).await?;
            if !client.is_active() {
                debug!(%client_id, "client already inactive");
                return Ok(false);
            }
            client.set_inactive(now);
            uow.clients().update(&client).await?;
            Ok(true)
        }
        .await;

        if finish(uow, result).await? {
            info!(%client_id, "client deactivated");
            self.ctx
                .events
                .publish(Event::ClientDeactivated(client_id))
                .await;
        }
        Ok(())
    }
}

async fn load(uow: &dyn UnitOfWork, client_id: Uuid) -> Result<Client, ServiceError> {
    uow.clients()
        .find_by_id(client_id)
        .await?
        .ok_or_else(|| ServiceError::client_not_found(client_id))
}
