//! Client and employee command handlers.
//!
//! Both entities share the person form (name, phone, birthday, address,
//! password, branch) and the verification / activity list filters.

use std::str::FromStr;

use refdesk_api::types::{
    Client, ClientDetail, ClientInput, Employee, EmployeeDetail, EmployeeInput,
};
use refdesk_api::{Clients, Employees};
use refdesk_core::{Activity, Column, ListFilter, Verification};

use crate::cli::{
    ClientsArgs, ClientsCommand, EmployeesArgs, EmployeesCommand, GlobalOpts, PersonFields,
    PersonFilterArgs,
};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::TextColumn;

use super::crud::{self, CliResource};
use super::util;

impl CliResource for Clients {
    const COMMAND: &'static str = "clients";

    fn columns() -> Vec<TextColumn<Client>> {
        vec![
            Column::text("id", "ID").sortable(),
            Column::text("name", "Name").sortable(),
            Column::text("phone", "Phone").sortable(),
            Column::text("birthday", "Birthday"),
            Column::text("address", "Address"),
            Column::text("manager_id", "Manager"),
            Column::boolean("active", "Active"),
        ]
    }

    fn row_id(row: &Client) -> u64 {
        row.id
    }
}

impl CliResource for Employees {
    const COMMAND: &'static str = "employees";

    fn columns() -> Vec<TextColumn<Employee>> {
        vec![
            Column::text("id", "ID").sortable(),
            Column::text("name", "Name").sortable(),
            Column::text("phone", "Phone").sortable(),
            Column::text("birthday", "Birthday"),
            Column::text("address", "Address"),
            Column::boolean("active", "Active"),
        ]
    }

    fn row_id(row: &Employee) -> u64 {
        row.id
    }
}

// ── Filters ──────────────────────────────────────────────────────────

fn person_filters(args: &PersonFilterArgs) -> Result<Vec<ListFilter>, CliError> {
    let mut filters = Vec::new();
    if let Some(branch) = args.branch {
        filters.push(ListFilter::Branch(branch));
    }
    if let Some(ref raw) = args.verified {
        let v = Verification::from_str(raw).map_err(|_| CliError::Validation {
            field: "verified".into(),
            reason: format!("unknown value '{raw}'"),
        })?;
        filters.push(ListFilter::Verification(v));
    }
    if let Some(ref raw) = args.activity {
        let a = Activity::from_str(raw).map_err(|_| CliError::Validation {
            field: "activity".into(),
            reason: format!("unknown value '{raw}'"),
        })?;
        filters.push(ListFilter::Activity(a));
    }
    Ok(filters)
}

// ── Form ─────────────────────────────────────────────────────────────

/// The person fields both inputs share, borrowed mutably.
struct PersonForm<'a> {
    name: &'a mut String,
    phone: &'a mut String,
    birthday: &'a mut Option<chrono::NaiveDate>,
    address: &'a mut String,
    description: &'a mut String,
    password: &'a mut String,
    password_confirmation: &'a mut String,
    active: &'a mut bool,
    branch_id: &'a mut Option<u64>,
}

fn apply_person(fields: PersonFields, form: PersonForm<'_>) -> Result<(), CliError> {
    if let Some(name) = fields.name {
        *form.name = name;
    }
    if let Some(ref phone) = fields.phone {
        *form.phone = util::normalize_phone(phone);
    }
    if let Some(ref birthday) = fields.birthday {
        *form.birthday = Some(util::parse_date("birthday", birthday)?);
    }
    if let Some(address) = fields.address {
        *form.address = address;
    }
    if let Some(description) = fields.description {
        *form.description = description;
    }
    if let Some(password) = util::password_value(fields.password)? {
        form.password_confirmation.clone_from(&password);
        *form.password = password;
    }
    if let Some(active) = fields.active {
        *form.active = active;
    }
    if fields.branch.is_some() {
        *form.branch_id = fields.branch;
    }
    Ok(())
}

fn client_form(input: &mut ClientInput) -> PersonForm<'_> {
    PersonForm {
        name: &mut input.name,
        phone: &mut input.phone,
        birthday: &mut input.birthday,
        address: &mut input.address,
        description: &mut input.description,
        password: &mut input.password,
        password_confirmation: &mut input.password_confirmation,
        active: &mut input.active,
        branch_id: &mut input.branch_id,
    }
}

fn employee_form(input: &mut EmployeeInput) -> PersonForm<'_> {
    PersonForm {
        name: &mut input.name,
        phone: &mut input.phone,
        birthday: &mut input.birthday,
        address: &mut input.address,
        description: &mut input.description,
        password: &mut input.password,
        password_confirmation: &mut input.password_confirmation,
        active: &mut input.active,
        branch_id: &mut input.branch_id,
    }
}

fn client_input(detail: ClientDetail) -> ClientInput {
    ClientInput {
        birthday: util::backend_date(detail.birthday.as_deref()),
        name: detail.name,
        phone: detail.phone,
        address: detail.address.unwrap_or_default(),
        description: detail.description.unwrap_or_default(),
        password: String::new(),
        password_confirmation: String::new(),
        active: detail.active,
        branch_id: detail.branch_id,
        manager_id: detail.manager_id,
    }
}

fn employee_input(detail: EmployeeDetail) -> EmployeeInput {
    EmployeeInput {
        birthday: util::backend_date(detail.birthday.as_deref()),
        name: detail.name,
        phone: detail.phone,
        address: detail.address.unwrap_or_default(),
        description: detail.description.unwrap_or_default(),
        password: String::new(),
        password_confirmation: String::new(),
        active: detail.active,
        branch_id: detail.branch_id,
        roles: detail.roles,
    }
}

async fn save_client(
    backend: &Backend,
    id: Option<u64>,
    fields: PersonFields,
    manager: Option<u64>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input =
        crud::base_input::<Clients>(backend, id, fields.from_file.as_deref(), client_input).await?;
    apply_person(fields, client_form(&mut input))?;
    if manager.is_some() {
        input.manager_id = manager;
    }
    crud::save::<Clients>(backend, id, input, global).await
}

async fn save_employee(
    backend: &Backend,
    id: Option<u64>,
    fields: PersonFields,
    roles: Vec<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input =
        crud::base_input::<Employees>(backend, id, fields.from_file.as_deref(), employee_input)
            .await?;
    apply_person(fields, employee_form(&mut input))?;
    if !roles.is_empty() {
        input.roles = roles;
    }
    crud::save::<Employees>(backend, id, input, global).await
}

// ── Handlers ─────────────────────────────────────────────────────────

pub async fn handle_clients(
    backend: &Backend,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List {
            list,
            filters,
            manager,
        } => {
            let mut filters = person_filters(&filters)?;
            filters.extend(manager.map(ListFilter::Manager));
            crud::list::<Clients>(backend, &list, &filters, global).await
        }
        ClientsCommand::Get { id } => crud::get::<Clients>(backend, id, global).await,
        ClientsCommand::Create { fields, manager } => {
            save_client(backend, None, fields, manager, global).await
        }
        ClientsCommand::Update {
            id,
            fields,
            manager,
        } => save_client(backend, Some(id), fields, manager, global).await,
        ClientsCommand::Delete { id } => crud::delete::<Clients>(backend, id, global).await,
    }
}

pub async fn handle_employees(
    backend: &Backend,
    args: EmployeesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EmployeesCommand::List {
            list,
            filters,
            role,
        } => {
            let mut filters = person_filters(&filters)?;
            filters.extend(role.map(ListFilter::Role));
            crud::list::<Employees>(backend, &list, &filters, global).await
        }
        EmployeesCommand::Get { id } => crud::get::<Employees>(backend, id, global).await,
        EmployeesCommand::Create { fields, roles } => {
            save_employee(backend, None, fields, roles, global).await
        }
        EmployeesCommand::Update { id, fields, roles } => {
            save_employee(backend, Some(id), fields, roles, global).await
        }
        EmployeesCommand::Delete { id } => crud::delete::<Employees>(backend, id, global).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fields() -> PersonFields {
        PersonFields {
            name: Some("Ann".into()),
            phone: Some("901234567".into()),
            birthday: Some("1990-05-17".into()),
            address: None,
            description: None,
            password: Some("secret".into()),
            active: Some(false),
            branch: Some(3),
            from_file: None,
        }
    }

    #[test]
    fn flags_fill_the_client_form() {
        let mut input = ClientInput::default();
        apply_person(fields(), client_form(&mut input)).unwrap();
        assert_eq!(input.name, "Ann");
        assert_eq!(input.phone, "998901234567");
        assert_eq!(input.birthday, chrono::NaiveDate::from_ymd_opt(1990, 5, 17));
        assert_eq!(input.password_confirmation, "secret");
        assert!(!input.active);
        assert_eq!(input.branch_id, Some(3));
    }

    #[test]
    fn unset_flags_keep_edit_view_values() {
        let mut input = ClientInput {
            address: "Main st".into(),
            ..ClientInput::default()
        };
        let mut f = fields();
        f.password = None;
        apply_person(f, client_form(&mut input)).unwrap();
        assert_eq!(input.address, "Main st");
        assert!(input.password.is_empty());
    }

    #[test]
    fn filter_flags_become_typed_filters() {
        let filters = person_filters(&PersonFilterArgs {
            branch: Some(2),
            verified: Some("verified".into()),
            activity: Some("trashed".into()),
        })
        .unwrap();
        assert_eq!(
            filters,
            vec![
                ListFilter::Branch(2),
                ListFilter::Verification(Verification::Verified),
                ListFilter::Activity(Activity::Trashed),
            ]
        );
    }
}
