//! Savings list generation.

use serde::{Deserialize, Serialize};

use crate::models::Echelon;

/// The cost reduction of serving `served_j` right after `served_i`.
///
/// `served_i` is loaded at `origin_i`, `served_j` at `origin_j`. When both
/// origins coincide this is the classic Clarke-Wright saving; otherwise it
/// compares the two separate tours with the refill tour
/// `origin_i → served_i → origin_j → served_j → origin_i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Saving {
    /// Origin of the i-node.
    pub origin_i: usize,
    /// Origin of the j-node.
    pub origin_j: usize,
    /// Node ending the first route.
    pub served_i: usize,
    /// Node starting the second route.
    pub served_j: usize,
    /// Distance saved by the merge.
    pub value: f64,
}

/// Computes every saving of `echelon`, sorted by decreasing value.
///
/// For `O` origins and `S` served nodes this yields `O²·S² − O²·S` entries
/// (all ordered origin pairs times all ordered pairs of distinct served
/// nodes). The sort is stable; the order of equal savings is not part of
/// the contract.
///
/// # Examples
///
/// ```
/// use u_echelon::models::{Customer, Depot, Fleet, Instance, Satellite, SecondEchelon};
/// use u_echelon::constructive::compute_savings;
///
/// let instance = Instance::euclidean(
///     vec![Depot::new(0, 0, 0.0, 0.0, 0.0)],
///     vec![Satellite::new(0, 1, 0.0, 0.0, 0.0)],
///     vec![
///         Customer::new(0, 2, 3.0, 0.0, 0.0, 1),
///         Customer::new(1, 3, 4.0, 0.0, 0.0, 1),
///     ],
///     Fleet::new(1, 10),
///     Fleet::new(1, 10),
/// )
/// .unwrap();
/// let savings = compute_savings(&SecondEchelon::new(&instance));
/// assert_eq!(savings.len(), 2);
/// // s(0, 1) = 3 + 4 - 1
/// assert!((savings[0].value - 6.0).abs() < 1e-10);
/// ```
pub fn compute_savings<E: Echelon>(echelon: &E) -> Vec<Saving> {
    let num_origins = echelon.origins().len();
    let num_served = echelon.served().len();
    let mut savings = Vec::with_capacity(
        num_origins * num_origins * num_served * num_served - num_origins * num_origins * num_served,
    );

    for origin_i in 0..num_origins {
        let oi = echelon.origin_id(origin_i);
        for origin_j in 0..num_origins {
            let oj = echelon.origin_id(origin_j);
            for k in 0..num_served {
                let sk = echelon.served_id(k);
                for l in (k + 1)..num_served {
                    let sl = echelon.served_id(l);
                    let value = if origin_i == origin_j {
                        echelon.distance(oi, sk) + echelon.distance(oi, sl)
                            - echelon.distance(sk, sl)
                    } else {
                        echelon.distance(oi, sk) + echelon.distance(oj, sl)
                            - echelon.distance(sk, oj)
                            - echelon.distance(sl, oi)
                    };
                    savings.push(Saving {
                        origin_i,
                        origin_j,
                        served_i: k,
                        served_j: l,
                        value,
                    });
                    savings.push(Saving {
                        origin_i,
                        origin_j,
                        served_i: l,
                        served_j: k,
                        value,
                    });
                }
            }
        }
    }

    savings.sort_by(|a, b| b.value.total_cmp(&a.value));
    savings
}
