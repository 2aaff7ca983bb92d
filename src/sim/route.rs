/// Screens the app can show, and the routing seam the maze hands off to.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Route {
    Maze,
    Home,
    Credits,
}

impl Route {
    pub fn name(self) -> &'static str {
        match self {
            Route::Maze => "maze",
            Route::Home => "home",
            Route::Credits => "credits",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// External page-routing collaborator.
pub trait Router {
    fn navigate_to(&mut self, route: Route);
}

/// Router that records requests for the app loop to apply after the
/// current event is processed. Switching screens mid-event would tear
/// down the session that is still running.
#[derive(Default, Debug)]
pub struct RouteQueue {
    requests: Vec<Route>,
}

impl RouteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<Route> {
        std::mem::take(&mut self.requests)
    }

    #[cfg(test)]
    pub fn requests(&self) -> &[Route] {
        &self.requests
    }
}

impl Router for RouteQueue {
    fn navigate_to(&mut self, route: Route) {
        self.requests.push(route);
    }
}
