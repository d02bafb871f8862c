/*!

This is the long-form manual for `election_tally` and the `elcon` console.

## Election status

The status of an election is never stored. It is computed from the current
instant and the schedule of the election every time it is displayed:

| current instant              | status      |
|------------------------------|-------------|
| before the start             | `Scheduled` |
| between start and end        | `Active`    |
| after the end                | `Completed` |

Both the start and the end instants belong to the `Active` period. An election
whose start equals its end is active for exactly that instant.

If the end comes before the start (which the backend should never send), the
election is never active: it is `Scheduled` before its start and `Completed`
from its start onward.

Every listing of `elcon` uses the same function, [`crate::classify_status`].

## Tallies

Vote counts are received already aggregated per candidate. The tally adds
them up and computes for every candidate:

- the percentage of the total, rounded half up to the nearest integer
  (so `12.5` becomes `13`). When no vote was cast, every percentage is `0`.
  Percentages are rounded independently and may not add up to exactly 100.
- the width of the progress bar, relative to the leading candidate.

## Winners

The outcome is only shown for completed elections:

- no vote cast: no winner
- one candidate with the highest count: this candidate wins
- several candidates sharing the highest count: a tie between all of them

## Recent elections

The dashboard lists the elections whose start is the closest to the current
instant, whether in the past or in the future. A just-finished election and an
election starting tomorrow show up side by side.

## Input formats

The following formats are supported by `elcon`:
* `results` the results endpoint of the backend
* `admin_elections` the election listing of the administration endpoint
* `members` the member directory

### `results`

```text
{
  "success": true,
  "data": [
    {
      "id": "e1",
      "title": "Student council",
      "description": "Yearly election",
      "startTime": "2025-06-15T09:00:00Z",
      "endTime": "2025-06-20T17:00:00Z",
      "candidates": [
        { "id": "c1", "member": { "id": "m1", "name": "Anna", "email": "anna@example.org" },
          "status": "APPROVED", "voteCount": 12 }
      ]
    }
  ]
}
```

A response with `"success": false` is rejected. A missing or negative
`voteCount` is read as `0` and reported in the logs. A missing `status` is read
as `APPROVED`.

### `admin_elections`

```text
[
  { "id": "e1", "title": "Student council",
    "startTime": "2025-06-15", "endTime": "2025-06-20",
    "admin": { "name": "Jo" }, "candidates": [ { "id": "c1" } ] }
]
```

### `members`

```text
{ "members": [ { "id": "u1", "name": "Jo", "email": "jo@example.org",
                 "role": "ADMIN", "isBlocked": false, "lastLogin": null } ] }
```

### Timestamps

Timestamps follow RFC 3339 (`2025-06-15T09:00:00Z`, `2025-06-15T11:00:00+02:00`).
A date and time without offset (`2025-06-15T09:00:00`) is read as UTC, and a
plain date (`2025-06-15`) as midnight UTC.

## Configuration

`elcon` accepts a configuration file in JSON. Every option can also be passed
on the command line, which takes precedence over the file.

```text
{
  "input": "results.json",
  "inputType": "results",
  "view": "dashboard",
  "now": "2025-06-16T00:00:00Z",
  "recentLimit": 5,
  "year": 2025,
  "session": "login.json",
  "out": "stdout"
}
```

The `dashboard` and `members` views need a session: the response of the login
endpoint, `{ "user": { ... }, "token": "..." }`.

 */
