/*!

This is the long-form manual for `team_allocation` and `teamalloc`.

## How the teams are formed

Every person states two lists of projects: the projects they would like to join,
and the projects they would like to lead. A project appearing in both lists counts
as a leadership preference.

**Demand.** Each project receives a demand score: 1 for every interested person, and
`L + 1` for every person willing to lead it. `L` is the smallest of 10, 100,
1000, ... that is strictly larger than the number of people, so that one leader
always weighs more than all the members together.

**Processing order.** Projects are processed from the lowest to the highest demand
(ties keep the alphabetical order). Projects that barely have enough interest have
few possible teams, so serving them first rarely takes people away from a better
use. A consequence of this approach is that the most popular projects may not get
any team, depending on the rules.

**For each project:**
1. If the demand is lower than `leaders_per_team * L + min_team_size`, the project
   cannot get a team.
2. The people still available with an interest in the project are collected, in
   input order, as members and leaders.
3. If there are fewer of them than `min_team_size`, the project does not get a team.
4. The team size is chosen by [crate::best_split]: the largest size that divides
   the people evenly, or the one that leaves the fewest people out. These
   leftovers become an extra member for the first teams.
5. Each team takes `leaders_per_team` leaders, then members up to the team size.
   When the members run out, the remaining leaders complete the team as members.
   No team is formed once there are not enough leaders left.
6. Only the first `max_teams_per_project` teams are kept. The last team is dropped
   if it is smaller than `min_team_size`.
7. The people of the kept teams are no longer available.

At the end, the people that were never committed to a team are reported as
unassigned. Projects without any team are reported together, regardless of why
they did not get a team.

## Input format

`teamalloc` reads the responses of a form, one person per row, with a header row:

```text
Timestamp,Name,Email,Interested?,Leader?
2022/11/10 5:45:46 PM PST,Breach,breach@example.com,Blu,Red
2022/11/10 5:45:49 PM PST,Cypher,cypher@example.com,,Blu;Gre
```

The columns holding the name, the projects of interest and the projects to lead are
chosen by their header. A cell may list several projects separated by `;` or `,`
(the format used by the checkbox questions of Google Forms and Microsoft Forms).
Blank entries are ignored.

The following providers are supported:
* `csv` (default) Comma Separated Values
* `xlsx` Excel workbook. The worksheet is chosen with `excelWorksheetName`, or the
  first one is used.

## Output

The roster is written in CSV format: the name of each project with teams, then one
row per team member, with an empty row after each team. The people without a team
come last, below an `UNASSIGNED` row. The columns of each member row are chosen with
`--output-columns` (by default, the name column).

```text
Gre
Cypher,cypher@example.com
Raze,raze@example.com

UNASSIGNED
Breach,breach@example.com
```

The roster is only written once the allocation has succeeded.
A summary in JSON format can also be written with `--summary`, and compared with a
reference summary with `--reference`.

## Configuration

All the options can be passed on the command line or in a JSON configuration file
(`--config`). Options on the command line take precedence.

```json
{
  "outputSettings": {
    "outputFile": "teams.csv",
    "summaryFile": "teams_summary.json",
    "outputColumns": ["Name", "Email"],
    "unassignedLabel": "UNASSIGNED"
  },
  "inputSource": {
    "provider": "csv",
    "filePath": "responses.csv",
    "nameColumn": "Name",
    "interestColumn": "Interested?",
    "leaderColumn": "Leader?",
    "delimiters": ";,"
  },
  "rules": {
    "minTeamSize": 2,
    "maxTeamSize": 3,
    "maxTeamsPerProject": 1,
    "leadersPerTeam": 1
  }
}
```

Paths are relative to the directory of the configuration file.

 */
