use hub_core::access::{Audience, AudienceParts};
use hub_core::enums::VisibilityMode;

use crate::cli::subcommands::link::LinkFieldArgs;
use crate::commands::shared::parse::parse_enum;

/// Build the audience named by `--visibility` and the grant flags.
///
/// Returns `None` when no audience flag was given. Grant flags that the
/// chosen mode does not use are an error rather than silently dropped.
pub fn audience_from_flags(fields: &LinkFieldArgs) -> anyhow::Result<Option<Audience>> {
    let grants = [
        ("--department", &fields.departments),
        ("--team", &fields.teams),
        ("--project", &fields.projects),
        ("--user", &fields.users),
    ];
    let Some(raw) = fields.visibility.as_deref() else {
        if let Some((flag, _)) = grants.iter().find(|(_, ids)| !ids.is_empty()) {
            anyhow::bail!("{flag} requires --visibility");
        }
        return Ok(None);
    };

    let mode: VisibilityMode = parse_enum(raw, "visibility")?;
    let accepted: &[&str] = match mode {
        VisibilityMode::Public => &[],
        VisibilityMode::Department => &["--department"],
        VisibilityMode::Team => &["--team"],
        VisibilityMode::Project => &["--project", "--team"],
        VisibilityMode::Private => &["--user"],
    };
    if let Some((flag, _)) = grants
        .iter()
        .find(|(flag, ids)| !ids.is_empty() && !accepted.contains(flag))
    {
        anyhow::bail!("{flag} does not apply to {mode} visibility");
    }

    let parts = AudienceParts {
        department_ids: fields.departments.clone(),
        team_ids: fields.teams.clone(),
        project_ids: fields.projects.clone(),
        user_ids: fields.users.clone(),
    };
    Ok(Some(Audience::from_parts(mode, parts)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fields(visibility: Option<&str>) -> LinkFieldArgs {
        LinkFieldArgs {
            visibility: visibility.map(str::to_string),
            ..LinkFieldArgs::default()
        }
    }

    #[test]
    fn no_flags_leaves_audience_untouched() {
        assert_eq!(audience_from_flags(&fields(None)).unwrap(), None);
    }

    #[test]
    fn project_mode_takes_projects_and_teams() {
        let mut args = fields(Some("project"));
        args.projects = vec!["proj-1".into()];
        args.teams = vec!["team-4".into(), "team-4".into()];
        assert_eq!(
            audience_from_flags(&args).unwrap(),
            Some(Audience::Project {
                project_ids: vec!["proj-1".into()],
                team_ids: vec!["team-4".into()],
            })
        );
    }

    #[test]
    fn stray_grant_flags_are_rejected() {
        let mut args = fields(Some("department"));
        args.users = vec!["user-2".into()];
        let err = audience_from_flags(&args).unwrap_err();
        assert_eq!(err.to_string(), "--user does not apply to department visibility");

        let mut args = fields(None);
        args.teams = vec!["team-1".into()];
        let err = audience_from_flags(&args).unwrap_err();
        assert_eq!(err.to_string(), "--team requires --visibility");
    }
}
