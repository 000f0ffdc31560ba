use super::super::{
    episode::{generate_episode, EpisodeStart},
    mdp::DiscreteMdp,
    soft_policy::SoftPolicy,
};
use crate::common::{defs::*, utils::random_policy};
use crate::error::{McError, Result};
use ndarray::Array2;
use rand::prelude::*;
use tracing::info;

const PROGRESS_EVERY: usize = 10000;

/// Sample-mean action values with the bookkeeping needed to update them
/// incrementally.
#[derive(Clone, Debug)]
pub struct ActionValues {
    q: Array2<Continous>,
    returns: Array2<Continous>,
    visits: Array2<usize>,
}

impl ActionValues {
    pub fn new(n_s: usize, n_a: usize) -> Self {
        Self {
            q: Array2::zeros((n_s, n_a)),
            returns: Array2::zeros((n_s, n_a)),
            visits: Array2::zeros((n_s, n_a)),
        }
    }

    pub fn q(&self) -> &Array2<Continous> {
        &self.q
    }

    pub fn visits(&self) -> &Array2<usize> {
        &self.visits
    }

    /// First-visit update: only the first occurrence of each `(s, a)` in the
    /// episode contributes its return. A non-finite return would poison the
    /// sample mean and is rejected before anything is accumulated.
    pub fn first_visit_update(&mut self, ep: &[EpisodeEvent]) -> Result<()> {
        if let Some(e) = ep.iter().find(|e| !e.r.is_finite()) {
            return Err(McError::NonFiniteReward {
                state: e.s,
                action: e.a,
                reward: e.r,
            });
        }

        for (t, e) in ep.iter().enumerate() {
            if !is_first_visit(ep, t) {
                continue;
            }

            let ix = [e.s, e.a];
            self.returns[ix] += e.r;
            self.visits[ix] += 1;
            self.q[ix] = self.returns[ix] / self.visits[ix] as Continous;
        }

        Ok(())
    }
}

fn is_first_visit(ep: &[EpisodeEvent], t: usize) -> bool {
    !ep.iter().take(t).any(|x| x.s == ep[t].s && x.a == ep[t].a)
}

/// Feasible action with the largest `q[s, .]`. Ties are broken uniformly at
/// random.
pub fn argmax_q(
    q: &Array2<Continous>,
    s: Discrete,
    feasible: &[Discrete],
    rng: &mut StdRng,
) -> Result<Discrete> {
    let maxq = feasible
        .iter()
        .map(|&a| q[[s, a]])
        .fold(Continous::NEG_INFINITY, Continous::max);

    feasible
        .iter()
        .filter(|&&a| q[[s, a]] == maxq)
        .choose(rng)
        .copied()
        .ok_or(McError::EmptyFeasibleSet { state: s })
}

/// Greedy policy with respect to `q`.
pub fn greedy_policy(
    q: &Array2<Continous>,
    feasible: &[Vec<Discrete>],
    rng: &mut StdRng,
) -> Result<Vec<Discrete>> {
    feasible
        .iter()
        .enumerate()
        .map(|(s, actions)| argmax_q(q, s, actions, rng))
        .collect()
}

/// Learned action values together with the greedy policy derived from them.
#[derive(Clone, Debug)]
pub struct Solution {
    pub q: Array2<Continous>,
    pub visits: Array2<usize>,
    pub policy: Vec<Discrete>,
}

impl Solution {
    /// The policy expressed as action levels instead of action indices.
    pub fn policy_values(&self, actions: &[Continous]) -> Vec<Continous> {
        self.policy.iter().map(|&a| actions[a]).collect()
    }
}

#[derive(Clone, Debug)]
pub struct SoftSolution {
    pub solution: Solution,
    pub soft_policy: SoftPolicy,
}

fn feasible_table<M: DiscreteMdp + ?Sized>(mdp: &M) -> Result<Vec<Vec<Discrete>>> {
    if mdp.n_s() == 0 || mdp.n_a() == 0 {
        return Err(McError::InvalidConfig(
            "MDP has no states or no actions".to_string(),
        ));
    }

    Ok((0..mdp.n_s())
        .map(|s| mdp.feasible_actions(s).to_vec())
        .collect())
}

/// Monte Carlo control with exploring starts.
///
/// Every episode starts from a uniformly drawn state and a uniformly drawn
/// feasible action there, then follows the current greedy policy.
pub fn run_mces<M>(mdp: &M, n_iterations: usize, rng: &mut StdRng) -> Result<Solution>
where
    M: DiscreteMdp + ?Sized,
{
    let feasible = feasible_table(mdp)?;
    let mut pol = random_policy(&feasible, rng)?;
    let mut values = ActionValues::new(mdp.n_s(), mdp.n_a());

    for iteration in 0..n_iterations {
        let s = rng.gen_range(0..mdp.n_s());
        let a = *feasible[s]
            .choose(rng)
            .ok_or(McError::EmptyFeasibleSet { state: s })?;

        let ep = generate_episode(
            mdp,
            EpisodeStart::ExploringStart {
                s,
                a,
                policy: &pol,
            },
            rng,
        )?;
        values.first_visit_update(&ep)?;

        for e in &ep {
            pol[e.s] = argmax_q(values.q(), e.s, &feasible[e.s], rng)?;
        }

        if iteration % PROGRESS_EVERY == 0 {
            info!(iteration, "Monte Carlo ES");
        }
    }

    Ok(Solution {
        q: values.q,
        visits: values.visits,
        policy: pol,
    })
}

/// On-policy Monte Carlo control with an epsilon-soft policy.
///
/// Episodes start from a uniformly drawn state; exploration comes from the
/// policy itself. The returned greedy policy is derived from the final `q`.
pub fn run_epsilon_soft<M>(
    mdp: &M,
    n_iterations: usize,
    epsilon: Continous,
    rng: &mut StdRng,
) -> Result<SoftSolution>
where
    M: DiscreteMdp + ?Sized,
{
    if !(0. ..=1.).contains(&epsilon) {
        return Err(McError::InvalidConfig(format!(
            "epsilon {epsilon} is not in [0, 1]"
        )));
    }

    let feasible = feasible_table(mdp)?;
    let mut soft = SoftPolicy::uniform(&feasible)?;
    let mut values = ActionValues::new(mdp.n_s(), mdp.n_a());

    for iteration in 0..n_iterations {
        let s = rng.gen_range(0..mdp.n_s());
        let ep = generate_episode(mdp, EpisodeStart::SoftPolicy { s, policy: &soft }, rng)?;
        values.first_visit_update(&ep)?;

        for e in &ep {
            let greedy = argmax_q(values.q(), e.s, &feasible[e.s], rng)?;
            soft.make_greedy(e.s, greedy, epsilon);
        }

        if iteration % PROGRESS_EVERY == 0 {
            info!(iteration, epsilon, "Monte Carlo epsilon-soft");
        }
    }

    let policy = greedy_policy(values.q(), &feasible, rng)?;
    Ok(SoftSolution {
        solution: Solution {
            q: values.q,
            visits: values.visits,
            policy,
        },
        soft_policy: soft,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdps::episode::tests::Chain;
    use float_eq::*;
    use ndarray::array;
    use rstest::rstest;

    fn ev(s: Discrete, a: Discrete, r: Continous) -> EpisodeEvent {
        EpisodeEvent { s, a, r }
    }

    #[test]
    fn first_visit_ignores_repeated_pair() {
        let mut values = ActionValues::new(3, 2);
        values.first_visit_update(&[ev(1, 0, 2.), ev(2, 1, 7.), ev(1, 0, 5.)]).unwrap();

        assert_float_eq!(values.q()[[1, 0]], 2., abs <= 1e-12);
        assert_eq!(values.visits()[[1, 0]], 1);
        assert_float_eq!(values.q()[[2, 1]], 7., abs <= 1e-12);
        assert_eq!(values.visits()[[2, 1]], 1);
        assert_eq!(values.visits().sum(), 2);
    }

    #[test]
    fn q_is_sample_mean_over_episodes() {
        let mut values = ActionValues::new(2, 2);
        values.first_visit_update(&[ev(1, 0, 2.)]).unwrap();
        values.first_visit_update(&[ev(1, 0, 4.), ev(1, 0, 100.)]).unwrap();
        values.first_visit_update(&[ev(0, 1, -1.), ev(1, 0, 9.)]).unwrap();

        assert_float_eq!(values.q()[[1, 0]], 5., abs <= 1e-12);
        assert_eq!(values.visits()[[1, 0]], 3);
        assert_float_eq!(values.q()[[0, 1]], -1., abs <= 1e-12);
    }

    #[test]
    fn same_state_different_actions_are_distinct_pairs() {
        let mut values = ActionValues::new(1, 2);
        values.first_visit_update(&[ev(0, 0, 1.), ev(0, 1, 3.)]).unwrap();

        assert_eq!(values.visits()[[0, 0]], 1);
        assert_eq!(values.visits()[[0, 1]], 1);
    }

    #[test]
    fn non_finite_return_is_rejected_untouched() {
        let mut values = ActionValues::new(2, 2);
        let err = values
            .first_visit_update(&[ev(0, 1, 3.), ev(1, 0, f64::NAN)])
            .unwrap_err();

        assert!(matches!(
            err,
            McError::NonFiniteReward {
                state: 1,
                action: 0,
                ..
            }
        ));
        assert_eq!(values.visits().sum(), 0);
    }

    #[test]
    fn argmax_breaks_ties_at_random() {
        let q = array![[1., 3., 3., 2.]];
        let counts = &mut [0usize; 4];
        for seed in 0..200 {
            let rng = &mut StdRng::seed_from_u64(seed);
            counts[argmax_q(&q, 0, &[0, 1, 2, 3], rng).unwrap()] += 1;
        }

        assert_eq!(counts[0] + counts[3], 0);
        assert!(counts[1] > 0);
        assert!(counts[2] > 0);
    }

    #[rstest]
    #[case(vec![0, 3], 3)]
    #[case(vec![0], 0)]
    #[case(vec![1, 3], 1)]
    fn argmax_only_considers_feasible_actions(
        #[case] feasible: Vec<Discrete>,
        #[case] expected: Discrete,
    ) {
        let q = array![[1., 3., 9., 2.]];
        let rng = &mut StdRng::seed_from_u64(5);

        assert_eq!(argmax_q(&q, 0, &feasible, rng).unwrap(), expected);
    }

    #[test]
    fn argmax_without_feasible_actions_is_fatal() {
        let q = array![[1., 3.]];
        let rng = &mut StdRng::seed_from_u64(5);

        assert!(matches!(
            argmax_q(&q, 0, &[], rng),
            Err(McError::EmptyFeasibleSet { state: 0 })
        ));
    }

    /// Chain whose rewards are NaN for every move out of state 0.
    struct NanChain(Chain);

    impl DiscreteMdp for NanChain {
        fn n_s(&self) -> usize {
            self.0.n_s()
        }

        fn n_a(&self) -> usize {
            self.0.n_a()
        }

        fn feasible_actions(&self, s: Discrete) -> &[Discrete] {
            self.0.feasible_actions(s)
        }

        fn sample_next_state(&self, a: Discrete, rng: &mut StdRng) -> Result<Discrete> {
            self.0.sample_next_state(a, rng)
        }

        fn reward(&self, s: Discrete, a: Discrete, next: Discrete) -> Continous {
            match s {
                0 => Continous::NAN,
                _ => self.0.reward(s, a, next),
            }
        }

        fn episode_length(&self) -> usize {
            self.0.episode_length()
        }
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn nan_reward_stops_the_run_with_its_own_error(#[case] soft: bool) {
        let mdp = NanChain(Chain::new(3, 1));
        let rng = &mut StdRng::seed_from_u64(4);
        let err = match soft {
            false => run_mces(&mdp, 500, rng).map(|_| ()),
            true => run_epsilon_soft(&mdp, 500, 0.2, rng).map(|_| ()),
        }
        .unwrap_err();

        assert!(matches!(err, McError::NonFiniteReward { state: 0, .. }));
    }

    #[test]
    fn mces_finds_best_action_on_chain() {
        let mdp = Chain::new(4, 1);
        let rng = &mut StdRng::seed_from_u64(2718);
        let sol = run_mces(&mdp, 2000, rng).unwrap();

        assert_eq!(sol.policy, vec![3, 3, 3, 3]);
        for ((s, a), &n) in sol.visits.indexed_iter() {
            if n > 0 {
                assert_float_eq!(sol.q[[s, a]], (10 * s + a) as f64, abs <= 1e-12);
            }
        }
        assert_eq!(sol.visits.sum(), 2000);
    }

    #[test]
    fn mces_respects_feasibility() {
        let mut mdp = Chain::new(3, 2);
        mdp.feasible = vec![vec![0], vec![0, 1], vec![1, 2]];
        let rng = &mut StdRng::seed_from_u64(3);
        let sol = run_mces(&mdp, 500, rng).unwrap();

        assert!(sol
            .policy
            .iter()
            .enumerate()
            .all(|(s, a)| mdp.feasible[s].contains(a)));
    }

    #[test]
    fn epsilon_soft_learns_greedy_policy() {
        let mdp = Chain::new(3, 1);
        let rng = &mut StdRng::seed_from_u64(11);
        let sol = run_epsilon_soft(&mdp, 5000, 0.3, rng).unwrap();

        assert_eq!(sol.solution.policy, vec![2, 2, 2]);
        for s in 0..3 {
            assert_float_eq!(sol.soft_policy.probability(s, 2), 0.8, abs <= 1e-12);
            assert_float_eq!(sol.soft_policy.probability(s, 0), 0.1, abs <= 1e-12);
        }
    }

    #[test]
    fn epsilon_soft_with_zero_epsilon_becomes_deterministic() {
        let mdp = Chain::new(4, 1);
        let rng = &mut StdRng::seed_from_u64(12);
        let sol = run_epsilon_soft(&mdp, 3000, 0., rng).unwrap();

        for s in 0..4 {
            let density = sol.soft_policy.density(s);
            assert_eq!(density.iter().filter(|&&p| p == 1.).count(), 1);
            assert_eq!(density.iter().filter(|&&p| p == 0.).count(), 3);
        }
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn epsilon_outside_unit_interval_is_rejected(#[case] epsilon: Continous) {
        let mdp = Chain::new(2, 1);
        let rng = &mut StdRng::seed_from_u64(0);

        assert!(matches!(
            run_epsilon_soft(&mdp, 10, epsilon, rng),
            Err(McError::InvalidConfig(_))
        ));
    }

    #[test]
    fn policy_values_map_indices_to_levels() {
        let sol = Solution {
            q: Array2::zeros((3, 2)),
            visits: Array2::zeros((3, 2)),
            policy: vec![1, 0, 1],
        };

        assert_float_eq!(
            sol.policy_values(&[0.5, 2.5]),
            vec![2.5, 0.5, 2.5],
            abs_all <= 0.
        );
    }
}
