use std::fmt;
use std::str::FromStr;

use exam_core::model::{ExamId, Role};

/// Navigational surface of the app. Paths mirror the web layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    TeacherDashboard,
    NewExam,
    StudentDashboard,
    TakeExam { exam_id: ExamId },
    Results { exam_id: ExamId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRoute(pub String);

impl fmt::Display for UnknownRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown route: {}", self.0)
    }
}

impl std::error::Error for UnknownRoute {}

impl Route {
    /// Landing page after sign-in.
    #[must_use]
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Teacher => Route::TeacherDashboard,
            Role::Student => Route::StudentDashboard,
        }
    }

    /// Role a signed-in account needs to open this route; `None` for login.
    #[must_use]
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Login => None,
            Route::TeacherDashboard | Route::NewExam => Some(Role::Teacher),
            Route::StudentDashboard | Route::TakeExam { .. } | Route::Results { .. } => {
                Some(Role::Student)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `UnknownRoute` for paths outside the app.
    pub fn parse(path: &str) -> Result<Self, UnknownRoute> {
        let unknown = || UnknownRoute(path.to_owned());
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] => Route::Login,
            ["teacher", "dashboard"] => Route::TeacherDashboard,
            ["teacher", "exams", "new"] => Route::NewExam,
            ["student", "dashboard"] => Route::StudentDashboard,
            ["student", "exam", id] => Route::TakeExam {
                exam_id: ExamId::new(*id).map_err(|_| unknown())?,
            },
            ["student", "results", id] => Route::Results {
                exam_id: ExamId::new(*id).map_err(|_| unknown())?,
            },
            _ => return Err(unknown()),
        };
        Ok(route)
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/"),
            Route::TeacherDashboard => f.write_str("/teacher/dashboard"),
            Route::NewExam => f.write_str("/teacher/exams/new"),
            Route::StudentDashboard => f.write_str("/student/dashboard"),
            Route::TakeExam { exam_id } => write!(f, "/student/exam/{exam_id}"),
            Route::Results { exam_id } => write!(f, "/student/results/{exam_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        let id = ExamId::new("abc123").unwrap();
        let routes = [
            Route::Login,
            Route::TeacherDashboard,
            Route::NewExam,
            Route::StudentDashboard,
            Route::TakeExam {
                exam_id: id.clone(),
            },
            Route::Results { exam_id: id },
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.to_string()).unwrap(), route);
        }
    }

    #[test]
    fn exam_path_selects_exam_id() {
        let route: Route = "/student/exam/math-1/".parse().unwrap();
        assert_eq!(
            route,
            Route::TakeExam {
                exam_id: ExamId::new("math-1").unwrap()
            }
        );
    }

    #[test]
    fn unknown_paths_are_rejected() {
        assert!(Route::parse("/admin").is_err());
        assert!(Route::parse("/student/exam").is_err());
    }

    #[test]
    fn dashboard_follows_role() {
        assert_eq!(Route::dashboard_for(Role::Teacher), Route::TeacherDashboard);
        assert_eq!(Route::dashboard_for(Role::Student), Route::StudentDashboard);
    }
}
