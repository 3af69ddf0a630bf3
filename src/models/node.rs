//! Network vertices: depots, satellites and customers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A time window constraint for service at a customer location.
///
/// The vehicle must start service no later than `due` and may arrive as early
/// as it likes (waiting until `ready` unless waiting is disabled).
///
/// # Examples
///
/// ```
/// use u_echelon::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.ready() <= tw.due());
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest allowable service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable service start.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Service start for a vehicle arriving at `arrival`.
    pub fn service_start(&self, arrival: f64) -> f64 {
        arrival.max(self.ready)
    }

    /// Returns `true` if starting service at the given time violates this window.
    pub fn is_violated(&self, start: f64) -> bool {
        !self.contains(start)
    }
}

/// Identity, location and handling time shared by every vertex.
///
/// `local_id` is the position of the vertex within its own kind (the n-th
/// satellite), `global_id` is unique across all vertices and indexes the
/// distance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    local_id: usize,
    global_id: usize,
    x: f64,
    y: f64,
    service_time: f64,
}

impl Site {
    /// Creates a site.
    pub fn new(local_id: usize, global_id: usize, x: f64, y: f64, service_time: f64) -> Self {
        Self {
            local_id,
            global_id,
            x,
            y,
            service_time,
        }
    }

    /// Unique id across all vertices.
    pub fn global_id(&self) -> usize {
        self.global_id
    }

    /// Euclidean distance to another site.
    pub fn distance_to(&self, other: &Site) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A vertex of the distribution network.
///
/// Every accessor has a default going through [`Node::site`], so the
/// routing engine can treat depots, satellites and customers uniformly.
pub trait Node {
    /// Single-letter prefix used when rendering routes.
    const LABEL: char;

    /// Shared vertex data.
    fn site(&self) -> &Site;

    /// Position within the vertex's own collection.
    fn local_id(&self) -> usize {
        self.site().local_id
    }

    /// Unique id across all vertices; indexes the distance matrix.
    fn global_id(&self) -> usize {
        self.site().global_id
    }

    /// X-coordinate.
    fn x(&self) -> f64 {
        self.site().x
    }

    /// Y-coordinate.
    fn y(&self) -> f64 {
        self.site().y
    }

    /// Handling time for one loading or unloading operation at this vertex.
    fn service_time(&self) -> f64 {
        self.site().service_time
    }
}

/// The origin of first-echelon vehicles.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Depot, Node};
///
/// let d = Depot::new(0, 0, 35.0, 35.0, 2.0);
/// assert_eq!(d.global_id(), 0);
/// assert_eq!(d.to_string(), "D0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    site: Site,
}

impl Depot {
    /// Creates a depot.
    pub fn new(local_id: usize, global_id: usize, x: f64, y: f64, service_time: f64) -> Self {
        Self {
            site: Site::new(local_id, global_id, x, y, service_time),
        }
    }
}

impl Node for Depot {
    const LABEL: char = 'D';

    fn site(&self) -> &Site {
        &self.site
    }
}

/// An intermediate facility: served by the first echelon, origin of the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    site: Site,
}

impl Satellite {
    /// Creates a satellite.
    pub fn new(local_id: usize, global_id: usize, x: f64, y: f64, service_time: f64) -> Self {
        Self {
            site: Site::new(local_id, global_id, x, y, service_time),
        }
    }
}

impl Node for Satellite {
    const LABEL: char = 'S';

    fn site(&self) -> &Site {
        &self.site
    }
}

/// A delivery point with a demand and an optional time window.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Customer, Node, TimeWindow};
///
/// let c = Customer::new(0, 3, 41.0, 49.0, 10.0, 7)
///     .with_time_window(TimeWindow::new(0.0, 120.0).unwrap());
/// assert_eq!(c.global_id(), 3);
/// assert_eq!(c.demand(), 7);
/// assert_eq!(c.time_window().unwrap().due(), 120.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    site: Site,
    demand: i32,
    time_window: Option<TimeWindow>,
}

impl Customer {
    /// Creates a customer without a time window.
    pub fn new(
        local_id: usize,
        global_id: usize,
        x: f64,
        y: f64,
        service_time: f64,
        demand: i32,
    ) -> Self {
        Self {
            site: Site::new(local_id, global_id, x, y, service_time),
            demand,
            time_window: None,
        }
    }

    /// Sets a time window for this customer.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Units to deliver.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Time window constraint, if any.
    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }
}

impl Node for Customer {
    const LABEL: char = 'C';

    fn site(&self) -> &Site {
        &self.site
    }
}

macro_rules! impl_node_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}{}", <$ty as Node>::LABEL, self.local_id())
                }
            }
        )*
    };
}

impl_node_display!(Depot, Satellite, Customer);
