use super::{mdp::DiscreteMdp, soft_policy::SoftPolicy};
use crate::common::defs::*;
use crate::error::Result;
use rand::rngs::StdRng;

/// How an episode begins and which policy drives it afterwards.
pub enum EpisodeStart<'a> {
    /// Forced first action, then the deterministic policy.
    ExploringStart {
        s: Discrete,
        a: Discrete,
        policy: &'a [Discrete],
    },
    /// Every action, the first included, drawn from the soft policy.
    SoftPolicy { s: Discrete, policy: &'a SoftPolicy },
}

/// Simulates `mdp.episode_length()` steps from `start`.
pub fn generate_episode<M>(
    mdp: &M,
    start: EpisodeStart,
    rng: &mut StdRng,
) -> Result<Vec<EpisodeEvent>>
where
    M: DiscreteMdp + ?Sized,
{
    let (mut s, mut forced) = match &start {
        EpisodeStart::ExploringStart { s, a, .. } => (*s, Some(*a)),
        EpisodeStart::SoftPolicy { s, .. } => (*s, None),
    };

    let n = mdp.episode_length();
    let mut ep = Vec::with_capacity(n);
    for _ in 0..n {
        let a = match (forced.take(), &start) {
            (Some(a), _) => a,
            (None, EpisodeStart::ExploringStart { policy, .. }) => policy.action(s, rng)?,
            (None, EpisodeStart::SoftPolicy { policy, .. }) => policy.action(s, rng)?,
        };
        let next = mdp.sample_next_state(a, rng)?;
        ep.push(EpisodeEvent {
            s,
            a,
            r: mdp.reward(s, a, next),
        });
        s = next;
    }

    Ok(ep)
}
