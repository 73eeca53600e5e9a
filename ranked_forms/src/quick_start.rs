/*!

# Quick start

This example runs a poll end to end with the `rforms` command line. We would like to decide
where the team goes for lunch, between three restaurants: Pizza, Sushi and Tacos.

**Creating a poll** Write the definition of the form in a file `lunch.json`:

```json
{
  "title": "Team lunch",
  "questions": [
    {"id": "name", "type": "short_text", "question": "Your name", "required": true},
    {"id": "food", "type": "ranked", "question": "Restaurants", "required": true,
     "options": ["Pizza", "Sushi", "Tacos"]}
  ]
}
```

and create the form. The program prints the id of the new form:

```bash
rforms create -f lunch.json
```

**Voting process** Each respondent submits a file with the plain answers and a list of
moves for the ranked question. Positions start at 1. This puts Tacos first, then swaps
Pizza and Sushi:

```bash
echo '{"name": "Ana"}' > ana.json
rforms submit <form id> -a ana.json --rank 'food:move:Tacos>Pizza' --rank 'food:down:2'
```

Ana ranked `Tacos, Sushi, Pizza`. A respondent happy with the default order confirms it:

```bash
rforms submit <form id> -a bo.json --rank food:keep
```

**Getting the results** Export the responses:

```bash
rforms export <form id>
```

This writes `Team_lunch_responses.csv` in the current directory, newest response first:

```text
"Submission Time","Your name","Restaurants - Rank 1","Restaurants - Rank 2","Restaurants - Rank 3"
"6/1/2024, 11:00:00 AM","Bo","Pizza","Sushi","Tacos"
"6/1/2024, 10:00:00 AM","Ana","Tacos","Sushi","Pizza"
```

Use `--out stdout` to print the export instead, and `--verbose` to see what the program does.

The same session with the library:

```
use chrono::{TimeZone, Utc};
use ranked_forms::builder::*;
use ranked_forms::{to_csv, ExportSettings};

let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
let form = FormBuilder::new("Team lunch")
    .question(Question::new("name", QuestionType::ShortText, "Your name").required())
    .question(
        Question::new("food", QuestionType::Ranked, "Restaurants")
            .required()
            .with_options(&["Pizza", "Sushi", "Tacos"]),
    )
    .build(now)?;

let mut respondent = ResponseBuilder::new(&form);
respondent.answer("name", Answer::from("Ana"))?;
let mut editor = respondent.ranking_editor("food")?;
editor.reorder("Tacos", "Pizza", &mut respondent);
editor.move_down(1, &mut respondent);
let response = respondent.build()?.into_response(now);

let csv = to_csv(&form, &[response], &ExportSettings::default())?;
assert_eq!(
    csv.lines().nth(1),
    Some(r#""6/1/2024, 10:00:00 AM","Ana","Tacos","Sushi","Pizza""#)
);
# Ok::<(), FormErrors>(())
```
*/
