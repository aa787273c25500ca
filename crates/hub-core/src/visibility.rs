//! Link visibility resolution.
//!
//! [`can_view`] decides whether a single viewer may see a link. The browse
//! helpers layer the dashboard's status rules on top of it.

use chrono::{DateTime, Utc};

use crate::access::Audience;
use crate::entities::{Link, Team, User};
use crate::enums::LinkStatus;
use crate::org::OrgChart;

/// Whether `viewer` may see `link`.
///
/// The creator always sees their own link and admins see every pending link
/// so they can moderate it. Everyone else goes through the audience rules.
#[must_use]
pub fn can_view(link: &Link, viewer: &User, chart: &OrgChart) -> bool {
    if link.creator_id == viewer.id {
        return true;
    }
    if viewer.is_admin() && link.status == LinkStatus::Pending {
        return true;
    }
    audience_admits(&link.audience, viewer, chart)
}

/// Audience rules alone, without the creator and moderation overrides.
///
/// Department grants cover sub-departments: the viewer's department and each
/// of its ancestors are checked against the allow-list.
#[must_use]
pub fn audience_admits(audience: &Audience, viewer: &User, chart: &OrgChart) -> bool {
    match audience {
        Audience::Public => true,
        Audience::Department { department_ids } => chart
            .department_lineage(&viewer.department_id)
            .into_iter()
            .any(|id| contains(department_ids, id)),
        Audience::Team { team_ids } => contains(team_ids, &viewer.team_id),
        Audience::Project {
            project_ids,
            team_ids,
        } => {
            contains(team_ids, &viewer.team_id)
                || chart
                    .team(&viewer.team_id)
                    .and_then(Team::project_id)
                    .is_some_and(|project| contains(project_ids, project))
        }
        Audience::Private { user_ids } => contains(user_ids, &viewer.id),
    }
}

/// The subset of `links` the viewer may see, in input order.
#[must_use]
pub fn visible_links<'a>(links: &'a [Link], viewer: &User, chart: &OrgChart) -> Vec<&'a Link> {
    links
        .iter()
        .filter(|link| can_view(link, viewer, chart))
        .collect()
}

/// Whether the link belongs on the viewer's dashboard.
///
/// Approved links show while live. Pending links show to their creator and to
/// admins. Rejected and archived links never show here.
#[must_use]
pub fn in_browse_set(link: &Link, viewer: &User, chart: &OrgChart, now: DateTime<Utc>) -> bool {
    if !can_view(link, viewer, chart) {
        return false;
    }
    match link.status {
        LinkStatus::Approved => !link.is_expired(now),
        LinkStatus::Pending => link.creator_id == viewer.id || viewer.is_admin(),
        LinkStatus::Rejected | LinkStatus::Archived => false,
    }
}

#[must_use]
pub fn browse_set<'a>(
    links: &'a [Link],
    viewer: &User,
    chart: &OrgChart,
    now: DateTime<Utc>,
) -> Vec<&'a Link> {
    links
        .iter()
        .filter(|link| in_browse_set(link, viewer, chart, now))
        .collect()
}

/// Whether `actor` may edit or delete `link`.
#[must_use]
pub fn can_manage(link: &Link, actor: &User) -> bool {
    actor.is_admin() || link.creator_id == actor.id
}

fn contains(ids: &[String], id: &str) -> bool {
    ids.iter().any(|candidate| candidate == id)
}
