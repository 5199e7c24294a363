use std::io::Write;

use clap::{Parser, Subcommand};
use futures::stream::{BoxStream, StreamExt};
use orgadmin_application::{AdminResourceFetcher, AdminService, PageQuery, ResourceFetcher};
use orgadmin_core::{ClientError, ClientResult};
use orgadmin_domain::{AuditEventType, AuditLogQuery, ResourceType, ResourceUri};
use serde::Serialize;

/// Command-line client for the organization admin API.
///
/// Commands print one JSON document per line on stdout. Configuration comes
/// from `ORGADMIN_*` environment variables or a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "orgadmin", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List organization members
    Users,
    /// Show one member
    User { user_id: String },
    /// List projects, archived included
    Projects,
    /// Show one project
    Project { project_id: String },
    /// List a project's service accounts
    ServiceAccounts { project_id: String },
    /// List invites
    Invites,
    /// List admin API keys
    ApiKeys,
    /// List uploaded certificates
    Certificates,
    /// List audit log events, optionally of one type
    AuditLogs { event_type: Option<AuditEventType> },
    /// Show completion usage for the last 7 days
    Usage,
    /// Fetch an orgadmin:// resource
    Resource { uri: ResourceUri },
    /// Serve resources to an MCP client on stdio
    Mcp,
}

impl Command {
    /// Name used to prefix errors for this command.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Users => "list users",
            Self::User { .. } => "retrieve user",
            Self::Projects => "list projects",
            Self::Project { .. } => "retrieve project",
            Self::ServiceAccounts { .. } => "list service accounts",
            Self::Invites => "list invites",
            Self::ApiKeys => "list admin API keys",
            Self::Certificates => "list certificates",
            Self::AuditLogs { .. } => "list audit logs",
            Self::Usage => "fetch usage",
            Self::Resource { .. } => "fetch resource",
            Self::Mcp => "serve mcp",
        }
    }
}

/// Runs a one-shot command, writing one JSON document per line to `out`.
pub async fn run<W>(
    command: Command,
    admin: &AdminService,
    fetcher: &AdminResourceFetcher,
    out: &mut W,
) -> ClientResult<()>
where
    W: Write,
{
    match command {
        Command::Users => print_stream(admin.list_users(PageQuery::new()), out).await,
        Command::User { user_id } => print_json(&admin.retrieve_user(&user_id).await?, out),
        Command::Projects => {
            print_stream(admin.list_projects(PageQuery::new(), true), out).await
        }
        Command::Project { project_id } => {
            print_json(&admin.retrieve_project(&project_id).await?, out)
        }
        Command::ServiceAccounts { project_id } => {
            print_stream(
                admin.list_project_service_accounts(&project_id, PageQuery::new()),
                out,
            )
            .await
        }
        Command::Invites => print_stream(admin.list_invites(PageQuery::new()), out).await,
        Command::ApiKeys => print_stream(admin.list_admin_api_keys(PageQuery::new()), out).await,
        Command::Certificates => {
            print_stream(admin.list_certificates(PageQuery::new()), out).await
        }
        Command::AuditLogs { event_type } => {
            let filters = AuditLogQuery {
                event_types: event_type.into_iter().collect(),
                ..AuditLogQuery::default()
            };
            print_stream(admin.list_audit_logs(PageQuery::new(), &filters), out).await
        }
        Command::Usage => {
            let uri = ResourceUri::of_type(ResourceType::UsageDashboard);
            print_json(&fetcher.fetch_resource(&uri).await?, out)
        }
        Command::Resource { uri } => print_json(&fetcher.fetch_resource(&uri).await?, out),
        Command::Mcp => Err(ClientError::Internal(format!(
            "'{}' is not a one-shot command",
            command.operation()
        ))),
    }
}

async fn print_stream<T, W>(
    mut items: BoxStream<'_, ClientResult<T>>,
    out: &mut W,
) -> ClientResult<()>
where
    T: Serialize,
    W: Write,
{
    let mut printed = 0_usize;
    while let Some(item) = items.next().await {
        print_json(&item?, out)?;
        printed += 1;
    }
    tracing::debug!(printed, "list finished");

    Ok(())
}

fn print_json<T, W>(value: &T, out: &mut W) -> ClientResult<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer(&mut *out, value)
        .map_err(|error| ClientError::Internal(format!("failed to encode output: {error}")))?;
    writeln!(out)
        .and_then(|()| out.flush())
        .map_err(|error| ClientError::Internal(format!("failed to write output: {error}")))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};
    use orgadmin_application::{
        AdminResourceFetcher, AdminService, RequestExecutor, Transport, TransportRequest,
        TransportResponse,
    };
    use orgadmin_core::ClientResult;
    use orgadmin_domain::{AuditEventType, ResourceUri};
    use serde_json::{Value, json};
    use tokio::sync::Mutex;

    use super::{Cli, Command, run};

    struct PagedTransport {
        pages: Mutex<VecDeque<Value>>,
    }

    #[async_trait]
    impl Transport for PagedTransport {
        async fn send(&self, _request: TransportRequest) -> ClientResult<TransportResponse> {
            let page = self.pages.lock().await.pop_front().unwrap_or(Value::Null);
            Ok(TransportResponse {
                status: 200,
                body: serde_json::to_vec(&page).unwrap_or_default(),
            })
        }
    }

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("orgadmin").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse(&["users"]).ok(), Some(Command::Users));
        assert_eq!(
            parse(&["service-accounts", "proj_1"]).ok(),
            Some(Command::ServiceAccounts {
                project_id: "proj_1".to_owned()
            })
        );
        assert_eq!(
            parse(&["audit-logs", "user.added"]).ok(),
            Some(Command::AuditLogs {
                event_type: Some(AuditEventType::UserAdded)
            })
        );
        assert_eq!(
            parse(&["audit-logs"]).ok(),
            Some(Command::AuditLogs { event_type: None })
        );
        assert_eq!(
            parse(&["resource", "orgadmin://member/user_1"]).ok(),
            ResourceUri::member("user_1")
                .ok()
                .map(|uri| Command::Resource { uri })
        );
    }

    #[test]
    fn rejects_bad_invocations() {
        assert_eq!(
            parse(&["user"]).err().map(|error| error.kind()),
            Some(ErrorKind::MissingRequiredArgument)
        );
        assert_eq!(
            parse(&["users", "extra"]).err().map(|error| error.kind()),
            Some(ErrorKind::UnknownArgument)
        );
        assert_eq!(
            parse(&["frobnicate"]).err().map(|error| error.kind()),
            Some(ErrorKind::InvalidSubcommand)
        );
        assert_eq!(
            parse(&["resource", "https://example.com"])
                .err()
                .map(|error| error.kind()),
            Some(ErrorKind::ValueValidation)
        );
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[tokio::test]
    async fn list_command_prints_one_line_per_item() {
        let transport = Arc::new(PagedTransport {
            pages: Mutex::new(VecDeque::from([
                json!({
                    "object": "list",
                    "data": [{
                        "object": "organization.invite",
                        "id": "invite_1",
                        "email": "a@example.com",
                        "role": "reader",
                        "status": "pending",
                        "invited_at": 1_711_471_533
                    }],
                    "last_id": "invite_1",
                    "has_more": true
                }),
                json!({
                    "object": "list",
                    "data": [{
                        "object": "organization.invite",
                        "id": "invite_2",
                        "email": "b@example.com",
                        "role": "owner",
                        "status": "accepted",
                        "invited_at": 1_711_471_533
                    }],
                    "has_more": false
                }),
            ])),
        });
        let admin = AdminService::new(RequestExecutor::new(transport, None));
        let fetcher = AdminResourceFetcher::new(admin.clone());

        let mut out = Vec::new();
        let result = run(Command::Invites, &admin, &fetcher, &mut out).await;
        assert!(result.is_ok());

        let printed = String::from_utf8_lossy(&out).into_owned();
        let lines = printed.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"invite_1\""));
        assert!(lines[1].contains("\"invited_at\":\"2024-03-26T16:45:33Z\""));
    }
}
