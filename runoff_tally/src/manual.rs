/*!

This is the long-form manual for `runoff_tally` and `runoffbot`.

## Holding an election in a channel

An election is a run of messages in one chat channel:

* one message marked with 🔰 starts the election. Everything posted after it
  belongs to this election.
* every message marked with ☑️, ✔️ or ✅ is a candidate. The name of the
  candidate is the text of the message, trimmed to its first and last letter or
  digit. `**Thai food!**` is the candidate `Thai food`.
* voters rank candidates by reacting with 1️⃣ (first choice), 2️⃣, ... up to 🔟.
  A voter does not need to rank every candidate, and gaps in a ranking are
  closed automatically: reacting 1️⃣ and 3️⃣ counts as a first and second choice.
* a voter may not use the same rank twice. Such a ballot stops the tabulation
  with an error naming the voter, so that the voter can fix it.

Running `runoffbot run` tabulates the election, replies to the starting
message with the full report, marks the winner with 🏆, every eliminated
candidate with ❌ and the starting message with 🏁. A finished election cannot
be tabulated again until it is reset with `runoffbot reset`.

## Tabulation

Each round, the candidate holding a strict majority of the first choices of
the remaining voters wins: with `n` voters, `n / 2 + 1` first choices (rounded
down) are needed. The last remaining candidate always wins.

Without a winner, the candidate with the fewest first choices is eliminated.
When several candidates are tied for the fewest:

* if all together they hold fewer first choices than the next candidate, all of
  them are eliminated in the same round. None of them could overtake the next
  candidate by gathering the votes of the others.
* otherwise one of them is drawn at random.

The rankings of the voters are then renumbered: the next choice of a voter
whose first choice was eliminated becomes that voter's first choice.

The alternate `preferenceScore` rule eliminates exactly one candidate per round
and resolves ties with the lowest preference score (a first choice is worth as
many points as there are running candidates, the last choice is worth 1) before
drawing at random.

## Configuration

The JSON configuration file accepts the following keys, all optional:

```json
{
  "adminRoleName": "ElectionAdmin",
  "maxMessages": 100,
  "rules": {
    "tiebreakMode": "random",
    "randomSeed": "42",
    "eliminationRule": "cascade",
    "maxRounds": 10
  }
}
```

* `tiebreakMode`: `random` (seeded when `randomSeed` is set), `hashed`
  (reproducible cryptographic draw, requires `randomSeed`) or
  `useCandidateOrder` (the last tied candidate in ballot order).
* `eliminationRule`: `cascade` or `preferenceScore`.
* `maxRounds`: stops with an error if no winner is found after this many
  rounds. Defaults to the number of candidates.

The `--seed` option of the command line replaces `randomSeed`.

Only members with the `adminRoleName` role may run or reset an election. If the
server has no role with this name, everyone may, and a warning is logged.

*/
