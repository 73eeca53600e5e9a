/*!

This is the long-form manual for `ranked_forms` and `rforms`.

## Forms

A form has a title, a description and an ordered list of questions. The following
question types are supported:
* `short_text`, `long_text`, `email`, `phone`, `date` Free text
* `multiple_choice`, `dropdown` One option among a list
* `checkboxes` Any number of options among a list
* `ranked` All the options of a list, put in order of preference

The choice types (`multiple_choice`, `dropdown`, `checkboxes`, `ranked`) must declare
at least one option, and may not list the same option twice. The ids of the questions must be unique within a form. When a form
is defined without ids, `rforms create` assigns them.

```json
{
  "title": "Team lunch",
  "description": "Pick the place for Friday",
  "questions": [
    {"type": "short_text", "question": "Your name", "required": true},
    {"type": "ranked", "question": "Restaurants", "required": true,
     "options": ["Pizza", "Sushi", "Tacos"]}
  ]
}
```

## Answers

An answer is either a string or a list of strings:
- text, multiple choice and dropdown questions take a string,
- checkboxes take the list of the checked options,
- ranked questions take the list of the options, most preferred first.

A required question is unanswered when its answer is missing, an empty string or an
empty list. A ranking may only contain declared options, each at most once.

### Editing a ranking

The ranking of a question starts from the order in which the options are declared.
Three moves are possible:

* move up: swaps the item at a position with the item just above it. Nothing happens
  for the first position.
* move down: swaps the item at a position with the item just below it. Nothing happens
  for the last position.
* reorder: takes an item out of the list and inserts it at the position of another
  item. Moving `C` onto `A` in `A, B, C` gives `C, A, B`.

Every move that changes the order reports the new ordering to the answers. A ranking
that was never touched is not recorded: a respondent who agrees with the default
order has to confirm it (`QID:keep` on the command line).

## Export format

The export is a CSV table where every cell is quoted and rows are separated by `\n`,
without a trailing newline.

The first column is `Submission Time`. Then each question gives one column, except
ranked questions which give one column per option: `<question> - Rank 1`,
`<question> - Rank 2`, and so on. The cells of a ranked question hold the ranking of the
respondent, padded with empty cells. Extra ranks beyond the number of options are
dropped. Checkbox answers are joined with `, `.

Responses are exported newest first. The name of the exported file is the title of the
form where every character that is not an ASCII letter or digit is replaced by `_`,
followed by `_responses.csv`.

## Reading the responses

`rforms responses <form id>` prints the responses as text, newest first. The oldest
response is `Response #1`. Rankings are listed one item per line, other lists are joined
with `, `, and questions left blank show `No answer`.

## Configuration

`rforms` reads an optional JSON configuration file (`--config`):

```json
{
  "dataDirectory": "data",
  "outputDirectory": "exports",
  "exportSettings": {
    "timestampFormat": "%-m/%-d/%Y, %-I:%M:%S %p",
    "utcOffset": "+02:00"
  }
}
```

- `dataDirectory` (default `data`): where `forms.json` and `responses.json` are kept.
  The `--data-dir` flag overrides it.
- `outputDirectory` (default `.`): where exports are written when `--out` is not given.
- `timestampFormat`: a `strftime` format for the submission times.
- `utcOffset`: minutes east of UTC, or a string such as `+02:00`, `-0530` or `UTC`.

Relative paths are resolved against the directory of the configuration file.
*/
