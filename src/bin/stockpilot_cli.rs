use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use stockpilot::{
    config,
    dto::{
        ClientDto, CreateClientRequest, CreateLocationRequest, CreateWarehouseRequest,
        InboundLotRequest, LocationDto, LotDetailDto, LotDto, MoveInternalLotRequest,
        MovementDto, OutboundLotRequest, TransferDispatchRequest, TransferReceiveRequest,
        UpdateClientRequest, UpdateLocationRequest, UpdateLotRequest, UpdateWarehouseRequest,
        WarehouseDto,
    },
    events::EventSender,
    seeding::DemoDataSeeder,
    services::Services,
};
use tracing::debug;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Seed(args) => handle_seed(&context, args, cli.json).await?,
        Commands::Clients(command) => handle_clients_command(&context, command, cli.json).await?,
        Commands::Warehouses(command) => {
            handle_warehouses_command(&context, command, cli.json).await?
        }
        Commands::Locations(command) => {
            handle_locations_command(&context, command, cli.json).await?
        }
        Commands::Lots(command) => handle_lots_command(&context, command, cli.json).await?,
        Commands::Movements(command) => {
            handle_movements_command(&context, command, cli.json).await?
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "stockpilot", about = "StockPilot CLI for warehouse inventory", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demo dataset
    Seed(SeedArgs),
    #[command(subcommand)]
    Clients(ClientsCommands),
    #[command(subcommand)]
    Warehouses(WarehousesCommands),
    #[command(subcommand)]
    Locations(LocationsCommands),
    #[command(subcommand)]
    Lots(LotsCommands),
    #[command(subcommand)]
    Movements(MovementsCommands),
}

#[derive(Args)]
struct SeedArgs {
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "Delete every record before seeding"
    )]
    reset: bool,
}

#[derive(Args)]
struct IdArg {
    #[arg(help = "Record identifier")]
    id: Uuid,
}

#[derive(Subcommand)]
enum ClientsCommands {
    Create(ClientArgs),
    List,
    Get(IdArg),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: ClientArgs,
    },
    Deactivate(IdArg),
}

#[derive(Args)]
struct ClientArgs {
    #[arg(long, help = "Client display name")]
    name: String,
    #[arg(long, help = "Contact email address")]
    email: String,
}

#[derive(Subcommand)]
enum WarehousesCommands {
    Create(WarehouseArgs),
    List,
    Get(IdArg),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: WarehouseArgs,
    },
    Close(IdArg),
}

#[derive(Args)]
struct WarehouseArgs {
    #[arg(long, help = "Warehouse name")]
    name: String,
    #[arg(long, help = "Postal address")]
    address: String,
}

#[derive(Subcommand)]
enum LocationsCommands {
    Create {
        #[arg(long, help = "Owning warehouse")]
        warehouse: Uuid,
        #[command(flatten)]
        fields: LocationArgs,
    },
    List {
        #[arg(long, help = "Only locations of this warehouse")]
        warehouse: Option<Uuid>,
    },
    Get(IdArg),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: LocationArgs,
    },
    Disable(IdArg),
}

#[derive(Args)]
struct LocationArgs {
    #[arg(long, help = "Location code, unique within its warehouse")]
    code: String,
    #[arg(long, help = "Optional human-readable label")]
    label: Option<String>,
}

#[derive(Subcommand)]
enum LotsCommands {
    Inbound {
        #[arg(long, help = "Owning client")]
        client: Uuid,
        #[arg(long, help = "Available location to store the lot in")]
        location: Uuid,
        #[arg(long)]
        reference: String,
        #[arg(long)]
        description: Option<String>,
    },
    Outbound {
        id: Uuid,
        #[arg(long)]
        notes: Option<String>,
    },
    Move {
        id: Uuid,
        #[arg(long, help = "Destination location in the same warehouse")]
        to: Uuid,
        #[arg(long)]
        notes: Option<String>,
    },
    Dispatch {
        id: Uuid,
        #[arg(long, help = "Destination location in another warehouse")]
        to: Uuid,
        #[arg(long)]
        notes: Option<String>,
    },
    Receive {
        id: Uuid,
        #[arg(long, help = "Location the lot arrives at")]
        at: Uuid,
        #[arg(long)]
        notes: Option<String>,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        reference: String,
        #[arg(long)]
        description: Option<String>,
    },
    Archive(IdArg),
    List {
        #[arg(long, conflicts_with = "warehouse")]
        client: Option<Uuid>,
        #[arg(long, help = "Only lots currently stored in this warehouse")]
        warehouse: Option<Uuid>,
    },
    Get(IdArg),
}

#[derive(Subcommand)]
enum MovementsCommands {
    /// Movements of one lot, newest first
    History(IdArg),
    Get(IdArg),
}

struct CliContext {
    services: Services,
    seeder: DemoDataSeeder,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(&config.log_level, config.log_json);

        let (event_sender, mut event_rx) = EventSender::channel(32);
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                debug!(target: "stockpilot_cli", event = ?event, "received async event");
            }
        });

        let runtime = stockpilot::bootstrap(&config, event_sender)
            .await
            .context("failed to connect to database")?;

        Ok(Self {
            services: Services::new(runtime.ctx.clone()),
            seeder: DemoDataSeeder::new(runtime.ctx),
        })
    }
}

async fn handle_seed(context: &CliContext, args: SeedArgs, json: bool) -> Result<()> {
    let summary = if args.reset {
        context.seeder.reset_and_seed().await
    } else {
        context.seeder.seed().await
    }
    .context("failed to seed demo data")?;

    if json {
        print_json(&summary)?;
    } else {
        println!(
            "Seeded {} clients, {} warehouses, {} locations, {} lots",
            summary.clients, summary.warehouses, summary.locations, summary.lots
        );
    }
    Ok(())
}

async fn handle_clients_command(
    context: &CliContext,
    command: ClientsCommands,
    json: bool,
) -> Result<()> {
    let service = &context.services.clients;
    match command {
        ClientsCommands::Create(args) => {
            let client = service
                .create(CreateClientRequest {
                    name: args.name,
                    contact_email: args.email,
                })
                .await
                .context("failed to create client")?;
            emit(json, &client, render_client)?;
        }
        ClientsCommands::List => {
            let clients = service.list().await.context("failed to list clients")?;
            emit_all(json, &clients, render_client)?;
        }
        ClientsCommands::Get(args) => {
            let client = service.get(args.id).await.context("failed to fetch client")?;
            emit(json, &client, render_client)?;
        }
        ClientsCommands::Update { id, fields } => {
            let client = service
                .update(
                    id,
                    UpdateClientRequest {
                        name: fields.name,
                        contact_email: fields.email,
                    },
                )
                .await
                .context("failed to update client")?;
            emit(json, &client, render_client)?;
        }
        ClientsCommands::Deactivate(args) => {
            service
                .deactivate(args.id)
                .await
                .context("failed to deactivate client")?;
            println!("Client {} is inactive", args.id);
        }
    }
    Ok(())
}

async fn handle_warehouses_command(
    context: &CliContext,
    command: WarehousesCommands,
    json: bool,
) -> Result<()> {
    let service = &context.services.warehouses;
    match command {
        WarehousesCommands::Create(args) => {
            let warehouse = service
                .create(CreateWarehouseRequest {
                    name: args.name,
                    address: args.address,
                })
                .await
                .context("failed to create warehouse")?;
            emit(json, &warehouse, render_warehouse)?;
        }
        WarehousesCommands::List => {
            let warehouses = service.list().await.context("failed to list warehouses")?;
            emit_all(json, &warehouses, render_warehouse)?;
        }
        WarehousesCommands::Get(args) => {
            let warehouse = service
                .get(args.id)
                .await
                .context("failed to fetch warehouse")?;
            emit(json, &warehouse, render_warehouse)?;
        }
        WarehousesCommands::Update { id, fields } => {
            let warehouse = service
                .update(
                    id,
                    UpdateWarehouseRequest {
                        name: fields.name,
                        address: fields.address,
                    },
                )
                .await
                .context("failed to update warehouse")?;
            emit(json, &warehouse, render_warehouse)?;
        }
        WarehousesCommands::Close(args) => {
            service
                .close(args.id)
                .await
                .context("failed to close warehouse")?;
            println!("Warehouse {} is closed", args.id);
        }
    }
    Ok(())
}

async fn handle_locations_command(
    context: &CliContext,
    command: LocationsCommands,
    json: bool,
) -> Result<()> {
    let service = &context.services.locations;
    match command {
        LocationsCommands::Create { warehouse, fields } => {
            let location = service
                .create(CreateLocationRequest {
                    warehouse_id: warehouse,
                    code: fields.code,
                    label: fields.label,
                })
                .await
                .context("failed to create location")?;
            emit(json, &location, render_location)?;
        }
        LocationsCommands::List { warehouse } => {
            let locations = match warehouse {
                Some(warehouse_id) => service.list_by_warehouse(warehouse_id).await,
                None => service.list().await,
            }
            .context("failed to list locations")?;
            emit_all(json, &locations, render_location)?;
        }
        LocationsCommands::Get(args) => {
            let location = service
                .get(args.id)
                .await
                .context("failed to fetch location")?;
            emit(json, &location, render_location)?;
        }
        LocationsCommands::Update { id, fields } => {
            let location = service
                .update(
                    id,
                    UpdateLocationRequest {
                        code: fields.code,
                        label: fields.label,
                    },
                )
                .await
                .context("failed to update location")?;
            emit(json, &location, render_location)?;
        }
        LocationsCommands::Disable(args) => {
            service
                .disable(args.id)
                .await
                .context("failed to disable location")?;
            println!("Location {} is in maintenance", args.id);
        }
    }
    Ok(())
}

async fn handle_lots_command(context: &CliContext, command: LotsCommands, json: bool) -> Result<()> {
    let services = &context.services;
    match command {
        LotsCommands::Inbound {
            client,
            location,
            reference,
            description,
        } => {
            let lot = services
                .inbound
                .inbound(InboundLotRequest {
                    client_id: client,
                    location_id: location,
                    reference,
                    description,
                })
                .await
                .context("inbound failed")?;
            emit(json, &lot, render_lot)?;
        }
        LotsCommands::Outbound { id, notes } => {
            let lot = services
                .outbound
                .outbound(OutboundLotRequest { lot_id: id, notes })
                .await
                .context("outbound failed")?;
            emit(json, &lot, render_lot)?;
        }
        LotsCommands::Move { id, to, notes } => {
            let lot = services
                .move_internal
                .move_lot(MoveInternalLotRequest {
                    lot_id: id,
                    destination_location_id: to,
                    notes,
                })
                .await
                .context("move failed")?;
            emit(json, &lot, render_lot)?;
        }
        LotsCommands::Dispatch { id, to, notes } => {
            let lot = services
                .transfer
                .dispatch(TransferDispatchRequest {
                    lot_id: id,
                    destination_location_id: to,
                    notes,
                })
                .await
                .context("dispatch failed")?;
            emit(json, &lot, render_lot)?;
        }
        LotsCommands::Receive { id, at, notes } => {
            let lot = services
                .transfer
                .receive(TransferReceiveRequest {
                    lot_id: id,
                    destination_location_id: at,
                    notes,
                })
                .await
                .context("receive failed")?;
            emit(json, &lot, render_lot)?;
        }
        LotsCommands::Update {
            id,
            reference,
            description,
        } => {
            let lot = services
                .update_lot
                .update(UpdateLotRequest {
                    lot_id: id,
                    reference,
                    description,
                })
                .await
                .context("update failed")?;
            emit(json, &lot, render_lot)?;
        }
        LotsCommands::Archive(args) => {
            services
                .update_lot
                .archive(args.id)
                .await
                .context("archive failed")?;
            println!("Lot {} is archived", args.id);
        }
        LotsCommands::List { client, warehouse } => {
            let lots = match (client, warehouse) {
                (Some(client_id), _) => services.lot_query.by_client(client_id).await,
                (None, Some(warehouse_id)) => services.lot_query.by_warehouse(warehouse_id).await,
                (None, None) => services.lot_query.list().await,
            }
            .context("failed to list lots")?;
            emit_all(json, &lots, render_lot_detail)?;
        }
        LotsCommands::Get(args) => {
            let lot = services
                .lot_query
                .get(args.id)
                .await
                .context("failed to fetch lot")?;
            emit(json, &lot, render_lot_detail)?;
        }
    }
    Ok(())
}

async fn handle_movements_command(
    context: &CliContext,
    command: MovementsCommands,
    json: bool,
) -> Result<()> {
    let service = &context.services.movement_query;
    match command {
        MovementsCommands::History(args) => {
            let movements = service
                .by_lot(args.id)
                .await
                .context("failed to load lot history")?;
            emit_all(json, &movements, render_movement)?;
        }
        MovementsCommands::Get(args) => {
            let movement = service
                .get(args.id)
                .await
                .context("failed to fetch movement")?;
            emit(json, &movement, render_movement)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, render: fn(&T)) -> Result<()> {
    if json {
        print_json(value)
    } else {
        render(value);
        Ok(())
    }
}

fn emit_all<T: Serialize>(json: bool, values: &[T], render: fn(&T)) -> Result<()> {
    if json {
        return print_json(&values);
    }
    if values.is_empty() {
        println!("(none)");
    }
    values.iter().for_each(render);
    Ok(())
}

fn render_client(client: &ClientDto) {
    println!(
        "- Client {} • {} <{}> • {}",
        client.id, client.name, client.contact_email, client.status
    );
}

fn render_warehouse(warehouse: &WarehouseDto) {
    println!(
        "- Warehouse {} • {} • {} • {}",
        warehouse.id, warehouse.name, warehouse.address, warehouse.status
    );
}

fn render_location(location: &LocationDto) {
    println!(
        "- Location {} • {} ({}) • warehouse {} • {}",
        location.id,
        location.code,
        location.label.as_deref().unwrap_or("-"),
        location.warehouse_id,
        location.status
    );
}

fn render_lot(lot: &LotDto) {
    let location = if lot.location_id.is_nil() {
        "-".to_string()
    } else {
        lot.location_id.to_string()
    };
    println!(
        "- Lot {} • {} • client {} • location {} • {}",
        lot.id, lot.reference, lot.client_id, location, lot.status
    );
}

fn render_lot_detail(lot: &LotDetailDto) {
    println!(
        "- Lot {} • {} • {} • {} / {} • {}",
        lot.id,
        lot.reference,
        lot.client_name,
        lot.warehouse_name.as_deref().unwrap_or("-"),
        lot.location_code.as_deref().unwrap_or("-"),
        lot.status
    );
}

fn render_movement(movement: &MovementDto) {
    let from = movement
        .from_location_id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let to = movement
        .to_location_id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    println!(
        "- {} {} • {} -> {} • by {} • {}",
        movement.occurred_at.to_rfc3339(),
        movement.movement_type,
        from,
        to,
        movement.performed_by,
        movement.reason.as_deref().unwrap_or("")
    );
}
