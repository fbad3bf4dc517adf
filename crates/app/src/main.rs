//! Medstore CLI

use std::{process::ExitCode, str::FromStr, sync::Arc, time::Duration};

use clap::{ArgAction, Args, Parser, Subcommand};
use medstore::{
    builder::{MIN_QUERY_CHARS, OrderBuilder, SEARCH_RESULT_LIMIT},
    cart::Cart,
    medicines::{Medicine, MedicineId, MedicineInput, MedicineUpdate, PackagingType},
    orders::{CustomerDetails, Language, Order},
};
use medstore_app::{
    api::{ApiClient, PasswordChange, ProfileUpdate, RegisterRequest},
    checkout,
    config::ClientConfig,
    observability,
    search::RowSearch,
    session::{FileStorage, Role, SessionContext},
};
use rust_decimal::Decimal;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "medstore", about = "Medical store client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in
    Login(LoginArgs),

    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Change the signed-in user's name or phone
    Profile(ProfileArgs),

    /// Change the signed-in user's password
    Password(PasswordArgs),

    /// Search the catalog
    Search(SearchArgs),

    /// Manage catalog entries
    #[command(subcommand)]
    Medicine(MedicineCommands),

    /// Enter a walk-in order at the counter
    Order(OrderArgs),

    /// Show the saved counter order draft
    Draft,

    /// Place an online order from cart lines
    Checkout(CheckoutArgs),

    /// List orders
    Orders(OrdersArgs),

    /// Show one order
    OrderShow(OrderIdArgs),

    /// Print the invoice download link of an order
    Invoice(OrderIdArgs),

    /// Show dashboard figures
    Stats,

    /// List medicines at or below their reorder level
    LowStock,

    /// List accounts
    Users,

    /// Enable or disable an account
    UserStatus(UserStatusArgs),
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Login email
    #[arg(long)]
    email: String,

    /// Password
    #[arg(long, env = "MEDSTORE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Contact phone
    #[arg(long)]
    phone: Option<String>,

    /// Password
    #[arg(long, env = "MEDSTORE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Account role
    #[arg(long, value_enum, default_value_t = Role::Customer)]
    role: Role,
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// New display name
    #[arg(long, required_unless_present = "phone")]
    name: Option<String>,

    /// New contact phone
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Debug, Args)]
struct PasswordArgs {
    /// Current password
    #[arg(long, env = "MEDSTORE_PASSWORD", hide_env_values = true)]
    current_password: String,

    /// Replacement password
    #[arg(long, env = "MEDSTORE_NEW_PASSWORD", hide_env_values = true)]
    new_password: String,
}

#[derive(Debug, Subcommand)]
enum MedicineCommands {
    /// Page through the catalog
    List(MedicineListArgs),

    /// Medicines with exactly this name
    Find(MedicineFindArgs),

    /// Add a catalog entry
    Add(MedicineAddArgs),

    /// Change fields of a catalog entry
    Update(MedicineUpdateArgs),

    /// Remove a catalog entry
    Delete(MedicineIdArgs),
}

#[derive(Debug, Args)]
struct MedicineListArgs {
    /// Entries to skip
    #[arg(long, default_value_t = 0)]
    skip: u32,

    /// Entries to show
    #[arg(long, default_value_t = 100)]
    limit: u32,
}

#[derive(Debug, Args)]
struct MedicineFindArgs {
    /// Medicine name
    name: String,
}

#[derive(Debug, Args)]
struct MedicineIdArgs {
    /// Catalog identifier
    id: u64,
}

#[derive(Debug, Args)]
struct MedicineAddArgs {
    /// Display name
    name: String,

    /// Hindi display name
    #[arg(long)]
    name_hindi: Option<String>,

    /// Generic (salt) name
    #[arg(long)]
    generic_name: Option<String>,

    /// Manufacturer
    #[arg(long)]
    company: Option<String>,

    /// Therapeutic category
    #[arg(long)]
    category: Option<String>,

    /// Selling price of one unit
    #[arg(long)]
    price: Decimal,

    /// Maximum retail price
    #[arg(long)]
    mrp: Decimal,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    stock: u32,

    /// Reorder threshold
    #[arg(long, default_value_t = 10)]
    reorder_level: u32,

    /// Default packaging
    #[arg(long, default_value_t = PackagingType::Strip)]
    packaging: PackagingType,

    /// Sold on prescription only
    #[arg(long)]
    prescription_required: bool,

    /// Shelf location
    #[arg(long)]
    rack_location: Option<String>,
}

impl MedicineAddArgs {
    fn input(&self) -> MedicineInput {
        MedicineInput {
            name: self.name.clone(),
            name_hindi: self.name_hindi.clone(),
            generic_name: self.generic_name.clone(),
            company: self.company.clone(),
            category: self.category.clone(),
            price_per_unit: self.price,
            mrp: self.mrp,
            stock_quantity: self.stock,
            reorder_level: self.reorder_level,
            default_packaging: self.packaging,
            prescription_required: self.prescription_required,
            rack_location: self.rack_location.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct MedicineUpdateArgs {
    /// Catalog identifier
    id: u64,

    /// Display name
    #[arg(long)]
    name: Option<String>,

    /// Hindi display name
    #[arg(long)]
    name_hindi: Option<String>,

    /// Selling price of one unit
    #[arg(long)]
    price: Option<Decimal>,

    /// Maximum retail price
    #[arg(long)]
    mrp: Option<Decimal>,

    /// Units in stock
    #[arg(long)]
    stock: Option<u32>,

    /// Reorder threshold
    #[arg(long)]
    reorder_level: Option<u32>,

    /// Default packaging
    #[arg(long)]
    packaging: Option<PackagingType>,

    /// Therapeutic category
    #[arg(long)]
    category: Option<String>,

    /// Shelf location
    #[arg(long)]
    rack_location: Option<String>,
}

impl MedicineUpdateArgs {
    fn update(&self) -> MedicineUpdate {
        MedicineUpdate {
            name: self.name.clone(),
            name_hindi: self.name_hindi.clone(),
            price_per_unit: self.price,
            mrp: self.mrp,
            stock_quantity: self.stock,
            reorder_level: self.reorder_level,
            default_packaging: self.packaging,
            category: self.category.clone(),
            rack_location: self.rack_location.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Medicine name or part of it
    query: String,

    /// Maximum number of matches
    #[arg(long, default_value_t = SEARCH_RESULT_LIMIT)]
    limit: usize,
}

#[derive(Debug, Args)]
struct CustomerArgs {
    /// Customer name
    #[arg(long)]
    customer_name: String,

    /// Customer phone number
    #[arg(long)]
    customer_phone: String,

    /// Delivery address
    #[arg(long)]
    address: Option<String>,
}

impl CustomerArgs {
    fn details(&self) -> CustomerDetails {
        let customer = CustomerDetails::new(&self.customer_name, &self.customer_phone);

        match &self.address {
            Some(address) => customer.with_address(address),
            None => customer,
        }
    }
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[command(flatten)]
    customer: CustomerArgs,

    /// Medicine and quantity as NAME[:QTY]; repeat for more rows. Names
    /// cannot contain `:`
    #[arg(long = "item", required = true)]
    items: Vec<ItemArg>,

    /// Save the form as a draft instead of placing the order
    #[arg(long)]
    save_draft: bool,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    #[command(flatten)]
    customer: CustomerArgs,

    /// Cart line as NAME[:QTY[:PACKAGING]]; repeat for more lines. Names
    /// cannot contain `:`
    #[arg(long = "item", required = true)]
    items: Vec<ItemArg>,
}

#[derive(Debug, Args)]
struct OrdersArgs {
    /// Only orders placed by the signed-in user
    #[arg(long)]
    mine: bool,
}

#[derive(Debug, Args)]
struct OrderIdArgs {
    /// Order identifier
    id: u64,
}

#[derive(Debug, Args)]
struct UserStatusArgs {
    /// Account identifier
    id: u64,

    /// Whether the account may sign in
    #[arg(long, action = ArgAction::Set)]
    active: bool,
}

/// One `--item` value, `NAME[:QTY[:PACKAGING]]`.
///
/// `:` separates the parts, so a medicine name containing one cannot be
/// entered this way.
#[derive(Debug, Clone)]
struct ItemArg {
    query: String,
    quantity: u32,
    packaging: Option<PackagingType>,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(':');

        let query = parts
            .next()
            .map(str::trim)
            .filter(|query| query.chars().count() >= MIN_QUERY_CHARS)
            .ok_or_else(|| format!("`{value}` needs a medicine name of at least {MIN_QUERY_CHARS} characters"))?;

        let quantity = match parts.next() {
            Some(quantity) => quantity
                .trim()
                .parse::<u32>()
                .map_err(|error| format!("invalid quantity in `{value}`: {error}"))?,
            None => 1,
        };

        let packaging = parts
            .next()
            .map(PackagingType::from_str)
            .transpose()
            .map_err(|error| error.to_string())?;

        if parts.next().is_some() {
            return Err(format!("expected NAME[:QTY[:PACKAGING]], got `{value}`"));
        }

        Ok(Self {
            query: query.to_string(),
            quantity,
            packaging,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _printed = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = observability::init_subscriber(&cli.config.logging) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let storage = FileStorage::open(&cli.config.session.session_file)
        .map_err(|error| format!("failed to open session file: {error}"))?;

    let session = SessionContext::restore(storage)
        .map_err(|error| format!("failed to restore session: {error}"))?;

    let client = ApiClient::new(&cli.config.api, session)
        .map_err(|error| format!("failed to build http client: {error}"))?;

    debug!(api_url = client.base_url(), "client ready");

    match cli.command {
        Commands::Login(args) => login(&client, &args).await,
        Commands::Register(args) => register(&client, args).await,
        Commands::Logout => logout(&client).await,
        Commands::Whoami => whoami(&client).await,
        Commands::Profile(args) => update_profile(&client, &args).await,
        Commands::Password(args) => change_password(&client, &args).await,
        Commands::Search(args) => search(&client, &args).await,
        Commands::Medicine(command) => medicine(&client, &command).await,
        Commands::Order(args) => manual_order(&client, &args).await,
        Commands::Draft => show_draft(&client).await,
        Commands::Checkout(args) => cart_checkout(&client, &args).await,
        Commands::Orders(args) => list_orders(&client, &args).await,
        Commands::OrderShow(args) => show_order(&client, &args).await,
        Commands::Invoice(args) => {
            invoice(&client, &args);
            Ok(())
        }
        Commands::Stats => stats(&client).await,
        Commands::LowStock => low_stock(&client).await,
        Commands::Users => users(&client).await,
        Commands::UserStatus(args) => user_status(&client, &args).await,
    }
}

async fn require(client: &ApiClient, roles: &[Role]) -> Result<Role, String> {
    client
        .session()
        .lock()
        .await
        .require_role(roles)
        .map(|user| user.role)
        .map_err(|error| error.to_string())
}

async fn login(client: &ApiClient, args: &LoginArgs) -> Result<(), String> {
    let user = client
        .login(&args.email, &args.password)
        .await
        .map_err(|error| format!("login failed: {error}"))?;

    println!("signed in as {} ({})", user.name, user.role);

    Ok(())
}

async fn register(client: &ApiClient, args: RegisterArgs) -> Result<(), String> {
    let user = client
        .register(&RegisterRequest {
            name: args.name,
            email: args.email,
            phone: args.phone,
            password: args.password,
            role: args.role,
        })
        .await
        .map_err(|error| format!("registration failed: {error}"))?;

    println!("registered and signed in as {} ({})", user.name, user.role);

    Ok(())
}

async fn logout(client: &ApiClient) -> Result<(), String> {
    client.logout().await.map_err(|error| error.to_string())?;

    println!("signed out");

    Ok(())
}

async fn whoami(client: &ApiClient) -> Result<(), String> {
    if client.session().user().await.is_none() {
        println!("not signed in");
        return Ok(());
    }

    let user = client.me().await.map_err(|error| error.to_string())?;

    println!("{} <{}>", user.name, user.email);
    println!("role: {}", user.role);

    if let Some(phone) = user.phone {
        println!("phone: {phone}");
    }

    Ok(())
}

async fn update_profile(client: &ApiClient, args: &ProfileArgs) -> Result<(), String> {
    require(client, &Role::ORDERING).await?;

    let user = client
        .update_profile(&ProfileUpdate {
            name: args.name.clone(),
            phone: args.phone.clone(),
        })
        .await
        .map_err(|error| format!("profile update failed: {error}"))?;

    println!("profile updated: {} ({})", user.name, user.phone.as_deref().unwrap_or("-"));

    Ok(())
}

async fn change_password(client: &ApiClient, args: &PasswordArgs) -> Result<(), String> {
    require(client, &Role::ORDERING).await?;

    client
        .change_password(&PasswordChange {
            current_password: args.current_password.clone(),
            new_password: args.new_password.clone(),
        })
        .await
        .map_err(|error| format!("password change failed: {error}"))?;

    println!("password changed");

    Ok(())
}

async fn medicine(client: &ApiClient, command: &MedicineCommands) -> Result<(), String> {
    require(client, &Role::STAFF).await?;

    match command {
        MedicineCommands::List(args) => {
            let medicines = client
                .list_medicines(args.skip, args.limit)
                .await
                .map_err(|error| error.to_string())?;

            print_medicines(&medicines);
        }
        MedicineCommands::Find(args) => {
            let medicines = client
                .medicines_by_name(&args.name)
                .await
                .map_err(|error| error.to_string())?;

            if medicines.is_empty() {
                println!("no medicine named `{}`", args.name);
            }

            print_medicines(&medicines);
        }
        MedicineCommands::Add(args) => {
            let medicine = client
                .create_medicine(&args.input())
                .await
                .map_err(|error| format!("could not add medicine: {error}"))?;

            println!("added medicine {}", medicine.id);
            print_medicines(&[medicine]);
        }
        MedicineCommands::Update(args) => {
            let update = args.update();

            if update == MedicineUpdate::default() {
                return Err("nothing to update".to_string());
            }

            let medicine = client
                .update_medicine(MedicineId(args.id), &update)
                .await
                .map_err(|error| format!("could not update medicine: {error}"))?;

            print_medicines(&[medicine]);
        }
        MedicineCommands::Delete(args) => {
            client
                .delete_medicine(MedicineId(args.id))
                .await
                .map_err(|error| format!("could not delete medicine: {error}"))?;

            println!("deleted medicine {}", args.id);
        }
    }

    Ok(())
}

async fn search(client: &ApiClient, args: &SearchArgs) -> Result<(), String> {
    let response = client
        .search_medicines(&args.query, args.limit)
        .await
        .map_err(|error| format!("search failed: {error}"))?;

    if response.medicines.is_empty() {
        println!("no medicines match `{}`", args.query);
    }

    print_medicines(&response.medicines);

    Ok(())
}

async fn manual_order(client: &ApiClient, args: &OrderArgs) -> Result<(), String> {
    require(client, &Role::ORDERING).await?;

    if args.items.iter().any(|item| item.packaging.is_some()) {
        return Err("counter orders use each medicine's default packaging".to_string());
    }

    let customer = args.customer.details();
    let mut builder = OrderBuilder::new();

    let (search, mut outcomes) = RowSearch::new(Arc::new(client.clone()));
    let mut search = search.with_debounce(Duration::ZERO);

    let first = builder.rows().next().map(|(row, _)| row);
    let mut rows = Vec::with_capacity(args.items.len());

    for (index, item) in args.items.iter().enumerate() {
        let row = match first {
            Some(row) if index == 0 => row,
            _ => builder.add_row(),
        };

        let outcome = builder
            .set_query(row, item.query.clone())
            .map_err(|error| error.to_string())?;

        search.on_query(row, outcome);
        rows.push((row, item));
    }

    for _ in 0..rows.len() {
        let outcome = outcomes
            .recv()
            .await
            .ok_or_else(|| "search stopped unexpectedly".to_string())?;

        if let Err(error) = &outcome.result {
            return Err(format!("search for `{}` failed: {error}", outcome.ticket.query()));
        }

        outcome.apply(&mut builder);
    }

    for (row, item) in rows {
        let candidates = builder
            .row(row)
            .map(|entry| entry.candidates().to_vec())
            .unwrap_or_default();

        let index = best_match(&candidates, &item.query)
            .ok_or_else(|| format!("no medicine matches `{}`", item.query))?;

        let selected = builder.select(row, index).map_err(|error| error.to_string())?;

        debug!(medicine = %selected.name, "row selected");

        builder
            .set_quantity(row, item.quantity)
            .map_err(|error| error.to_string())?;
    }

    for (_, row) in builder.rows() {
        if let (Some(selected), Some(total)) = (row.selected(), row.line_total()) {
            println!(
                "{:<32} {:<7} x{:<4} {}",
                selected.name,
                selected.packaging.as_str(),
                row.quantity(),
                total
            );
        }
    }

    let estimate = builder.estimate_total().map_err(|error| error.to_string())?;

    println!("estimated total: {estimate}");

    if args.save_draft {
        let mut session = client.session().lock().await;

        checkout::save_draft(&builder, &customer, session.storage_mut())
            .map_err(|error| format!("failed to save draft: {error}"))?;

        println!("draft saved");

        return Ok(());
    }

    let order = checkout::place_manual_order(&mut builder, &customer, Language::default(), client)
        .await
        .map_err(|error| error.to_string())?;

    print_order(&order);

    Ok(())
}

async fn show_draft(client: &ApiClient) -> Result<(), String> {
    let session = client.session().lock().await;

    let Some(stored) =
        checkout::load_draft(session.storage()).map_err(|error| format!("failed to read draft: {error}"))?
    else {
        println!("no saved draft");
        return Ok(());
    };

    println!("saved at {}", stored.saved_at);
    println!(
        "customer: {} ({})",
        stored.draft.customer.name, stored.draft.customer.phone
    );

    for line in &stored.draft.lines {
        println!(
            "{:<32} {:<7} x{:<4} {}",
            line.name,
            line.packaging.as_str(),
            line.quantity,
            line.total_price()
        );
    }

    println!("estimated total: {}", stored.draft.estimate_total);

    Ok(())
}

async fn cart_checkout(client: &ApiClient, args: &CheckoutArgs) -> Result<(), String> {
    require(client, &Role::ORDERING).await?;

    let customer = args.customer.details();
    let mut cart = Cart::new();

    for item in &args.items {
        let response = client
            .search_medicines(&item.query, SEARCH_RESULT_LIMIT)
            .await
            .map_err(|error| format!("search for `{}` failed: {error}", item.query))?;

        let medicine = best_match(&response.medicines, &item.query)
            .and_then(|index| response.medicines.get(index))
            .ok_or_else(|| format!("no medicine matches `{}`", item.query))?;

        let packaging = item.packaging.unwrap_or(medicine.default_packaging);

        cart.add_item(medicine, packaging, item.quantity)
            .map_err(|error| format!("cannot add {}: {error}", medicine.name))?;
    }

    let total = cart.total().map_err(|error| error.to_string())?;

    println!("{} lines, {} units, total {total}", cart.len(), cart.unit_count());

    let order = checkout::place_cart_order(&mut cart, &customer, Language::default(), client)
        .await
        .map_err(|error| error.to_string())?;

    print_order(&order);

    Ok(())
}

async fn list_orders(client: &ApiClient, args: &OrdersArgs) -> Result<(), String> {
    let orders = if args.mine {
        require(client, &Role::ORDERING).await?;
        client.my_orders().await
    } else {
        require(client, &Role::STAFF).await?;
        client.list_orders().await
    }
    .map_err(|error| error.to_string())?;

    for order in &orders {
        let customer = order
            .customer
            .as_ref()
            .map_or("-", |customer| customer.name.as_str());

        println!(
            "{:>5}  {:<20} {:<10} {:>10}  {customer}",
            order.id,
            order.order_number,
            order.status.to_string(),
            order.final_amount.to_string()
        );
    }

    Ok(())
}

async fn show_order(client: &ApiClient, args: &OrderIdArgs) -> Result<(), String> {
    require(client, &Role::ORDERING).await?;

    let order = client
        .get_order(args.id)
        .await
        .map_err(|error| error.to_string())?;

    print_order(&order);

    Ok(())
}

fn invoice(client: &ApiClient, args: &OrderIdArgs) {
    println!("{}", client.invoice_download_url(args.id));
}

async fn stats(client: &ApiClient) -> Result<(), String> {
    let role = require(client, &Role::ORDERING).await?;

    if Role::STAFF.contains(&role) {
        let stats = client
            .dashboard_stats()
            .await
            .map_err(|error| error.to_string())?;

        println!("orders:      {} ({} today)", stats.total_orders, stats.today_orders);
        println!("customers:   {}", stats.total_customers);
        println!("medicines:   {} ({} low on stock)", stats.total_medicines, stats.low_stock_medicines);
        println!("revenue:     {}", stats.total_revenue);
    } else {
        let stats = client.my_stats().await.map_err(|error| error.to_string())?;

        println!("orders:      {} ({} pending)", stats.total_orders, stats.pending_orders);
        println!("total spent: {}", stats.total_spent);
    }

    Ok(())
}

async fn low_stock(client: &ApiClient) -> Result<(), String> {
    require(client, &Role::STAFF).await?;

    let medicines = client.low_stock().await.map_err(|error| error.to_string())?;

    print_medicines(&medicines);

    Ok(())
}

async fn users(client: &ApiClient) -> Result<(), String> {
    require(client, &Role::ADMIN).await?;

    let users = client.users().await.map_err(|error| error.to_string())?;

    for user in &users {
        println!(
            "{:>5}  {:<24} {:<32} {:<10} {}",
            user.id,
            user.name,
            user.email,
            user.role.to_string(),
            if user.is_active { "active" } else { "disabled" }
        );
    }

    Ok(())
}

async fn user_status(client: &ApiClient, args: &UserStatusArgs) -> Result<(), String> {
    require(client, &Role::ADMIN).await?;

    client
        .set_user_active(args.id, args.active)
        .await
        .map_err(|error| error.to_string())?;

    println!(
        "user {} {}",
        args.id,
        if args.active { "enabled" } else { "disabled" }
    );

    Ok(())
}

/// Index of the candidate named exactly like `query`, else the first one.
fn best_match(candidates: &[Medicine], query: &str) -> Option<usize> {
    candidates
        .iter()
        .position(|medicine| medicine.name.eq_ignore_ascii_case(query.trim()))
        .or_else(|| (!candidates.is_empty()).then_some(0))
}

fn print_medicines(medicines: &[Medicine]) {
    for medicine in medicines {
        println!(
            "{:>6}  {:<32} {:<7} {:>12}  stock {:>5}{}",
            medicine.id.0,
            medicine.name,
            medicine.default_packaging.as_str(),
            medicine.unit_price().to_string(),
            medicine.stock_quantity,
            if medicine.is_low_stock() { " (low)" } else { "" }
        );
    }
}

fn print_order(order: &Order) {
    println!("order {} ({})", order.order_number, order.status);

    for line in &order.order_items {
        let name = line
            .medicine
            .as_ref()
            .map_or_else(|| line.medicine_id.to_string(), |medicine| medicine.name.clone());

        println!(
            "  {name:<32} {:<7} x{:<4} {}",
            line.packaging_type.as_str(),
            line.quantity,
            line.total_price
        );
    }

    println!("total: {}", order.final_amount);

    if let Some(invoice) = &order.invoice {
        println!("invoice: {}", invoice.invoice_number);
    }
}
